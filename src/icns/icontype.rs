use std::fmt;
use std::str::FromStr;

/// Types of ICNS icon elements that can be decoded as images or masks.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 16x16 24-bit icon (without alpha).
    RGB24_16x16,
    /// 16x16 8-bit alpha mask.
    Mask8_16x16,
    /// 32x32 24-bit icon (without alpha).
    RGB24_32x32,
    /// 32x32 8-bit alpha mask.
    Mask8_32x32,
    /// 48x48 24-bit icon (without alpha).
    RGB24_48x48,
    /// 48x48 8-bit alpha mask.
    Mask8_48x48,
    /// 128x128 24-bit icon (without alpha).
    RGB24_128x128,
    /// 128x128 8-bit alpha mask.
    Mask8_128x128,
    /// 16x16 32-bit icon.
    RGBA32_16x16,
    /// 16x16 32-bit icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit icon.
    RGBA32_32x32,
    /// 32x32 32-bit icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 64x64 32-bit icon.
    RGBA32_64x64,
    /// 128x128 32-bit icon.
    RGBA32_128x128,
    /// 128x128 32-bit icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit icon.
    RGBA32_256x256,
    /// 256x256 32-bit icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x,
    /// 512x512 32-bit icon.
    RGBA32_512x512,
    /// 512x512 32-bit icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x,
}

const ALL_ICON_TYPES: [IconType; 19] = [IconType::RGB24_16x16,
                                        IconType::Mask8_16x16,
                                        IconType::RGB24_32x32,
                                        IconType::Mask8_32x32,
                                        IconType::RGB24_48x48,
                                        IconType::Mask8_48x48,
                                        IconType::RGB24_128x128,
                                        IconType::Mask8_128x128,
                                        IconType::RGBA32_16x16,
                                        IconType::RGBA32_16x16_2x,
                                        IconType::RGBA32_32x32,
                                        IconType::RGBA32_32x32_2x,
                                        IconType::RGBA32_64x64,
                                        IconType::RGBA32_128x128,
                                        IconType::RGBA32_128x128_2x,
                                        IconType::RGBA32_256x256,
                                        IconType::RGBA32_256x256_2x,
                                        IconType::RGBA32_512x512,
                                        IconType::RGBA32_512x512_2x];

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        ALL_ICON_TYPES.iter().copied().find(|icon_type| {
            icon_type.ostype() == ostype
        })
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        let raw = match self {
            IconType::RGB24_16x16 => b"is32",
            IconType::Mask8_16x16 => b"s8mk",
            IconType::RGB24_32x32 => b"il32",
            IconType::Mask8_32x32 => b"l8mk",
            IconType::RGB24_48x48 => b"ih32",
            IconType::Mask8_48x48 => b"h8mk",
            IconType::RGB24_128x128 => b"it32",
            IconType::Mask8_128x128 => b"t8mk",
            IconType::RGBA32_16x16 => b"icp4",
            IconType::RGBA32_16x16_2x => b"ic11",
            IconType::RGBA32_32x32 => b"icp5",
            IconType::RGBA32_32x32_2x => b"ic12",
            IconType::RGBA32_64x64 => b"icp6",
            IconType::RGBA32_128x128 => b"ic07",
            IconType::RGBA32_128x128_2x => b"ic13",
            IconType::RGBA32_256x256 => b"ic08",
            IconType::RGBA32_256x256_2x => b"ic14",
            IconType::RGBA32_512x512 => b"ic09",
            IconType::RGBA32_512x512_2x => b"ic10",
        };
        OSType(*raw)
    }

    /// Returns true if this is the type of an alpha mask element rather than
    /// a color image.
    pub fn is_mask(self) -> bool {
        self.encoding() == Encoding::Mask8
    }

    /// Returns the type of the mask element that must be combined with this
    /// icon type to give a complete image, if any.
    pub fn mask_type(self) -> Option<IconType> {
        match self {
            IconType::RGB24_16x16 => Some(IconType::Mask8_16x16),
            IconType::RGB24_32x32 => Some(IconType::Mask8_32x32),
            IconType::RGB24_48x48 => Some(IconType::Mask8_48x48),
            IconType::RGB24_128x128 => Some(IconType::Mask8_128x128),
            _ => None,
        }
    }

    /// Returns the pixel data width of this icon type.  Normally this is the
    /// same as the screen width, but for 2x "retina" density icons, this will
    /// be twice that value.
    ///
    /// # Examples
    /// ```
    /// use attachment_icon::icns::IconType;
    /// assert_eq!(IconType::Mask8_128x128.pixel_width(), 128);
    /// assert_eq!(IconType::RGBA32_256x256.pixel_width(), 256);
    /// assert_eq!(IconType::RGBA32_256x256_2x.pixel_width(), 512);
    /// ```
    pub fn pixel_width(self) -> u32 {
        self.screen_width() * self.pixel_density()
    }

    /// Returns the pixel data height of this icon type.  Icons are square,
    /// so this is always the same as the pixel width.
    pub fn pixel_height(self) -> u32 {
        self.pixel_width()
    }

    /// Returns the pixel density for this icon type -- that is, 2 for 2x
    /// "retina" density icons, or 1 for other icon types.
    pub fn pixel_density(self) -> u32 {
        match self {
            IconType::RGBA32_16x16_2x |
            IconType::RGBA32_32x32_2x |
            IconType::RGBA32_128x128_2x |
            IconType::RGBA32_256x256_2x |
            IconType::RGBA32_512x512_2x => 2,
            _ => 1,
        }
    }

    /// Returns the screen width of this icon type.  Normally this is the same
    /// as the pixel width, but for 2x "retina" density icons, this will be
    /// half that value.
    ///
    /// # Examples
    /// ```
    /// use attachment_icon::icns::IconType;
    /// assert_eq!(IconType::RGBA32_256x256.screen_width(), 256);
    /// assert_eq!(IconType::RGBA32_256x256_2x.screen_width(), 256);
    /// ```
    pub fn screen_width(self) -> u32 {
        match self {
            IconType::RGB24_16x16 |
            IconType::Mask8_16x16 |
            IconType::RGBA32_16x16 |
            IconType::RGBA32_16x16_2x => 16,
            IconType::RGB24_32x32 |
            IconType::Mask8_32x32 |
            IconType::RGBA32_32x32 |
            IconType::RGBA32_32x32_2x => 32,
            IconType::RGB24_48x48 | IconType::Mask8_48x48 => 48,
            IconType::RGBA32_64x64 => 64,
            IconType::RGB24_128x128 |
            IconType::Mask8_128x128 |
            IconType::RGBA32_128x128 |
            IconType::RGBA32_128x128_2x => 128,
            IconType::RGBA32_256x256 | IconType::RGBA32_256x256_2x => 256,
            IconType::RGBA32_512x512 | IconType::RGBA32_512x512_2x => 512,
        }
    }

    /// Returns the encoding used within an ICNS file for this icon type.
    pub fn encoding(self) -> Encoding {
        match self {
            IconType::RGB24_16x16 |
            IconType::RGB24_32x32 |
            IconType::RGB24_48x48 |
            IconType::RGB24_128x128 => Encoding::RLE24,
            IconType::Mask8_16x16 |
            IconType::Mask8_32x32 |
            IconType::Mask8_48x48 |
            IconType::Mask8_128x128 => Encoding::Mask8,
            _ => Encoding::JP2PNG,
        }
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        for &byte in &self.0 {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}

/// Method of encoding an image within an icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// Icon element data payload is an uncompressed 8-bit alpha mask.
    Mask8,
    /// Icon element data payload is an RLE-compressed 24-bit RGB image.
    RLE24,
    /// Icon element data payload is a JPEG 2000 or PNG file, or an
    /// RLE-compressed ARGB image.
    JP2PNG,
}
