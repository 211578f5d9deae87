use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Error, ErrorKind, Read};

use super::element::IconElement;
use super::icontype::IconType;
use crate::image::Image;

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// Returns true if the data starts with the ICNS magic literal.
pub fn is_icns(data: &[u8]) -> bool {
    data.starts_with(ICNS_MAGIC_LITERAL)
}

/// A set of icons stored in a single ICNS file.
pub struct IconFamily {
    /// The icon elements stored in the ICNS file.
    pub elements: Vec<IconElement>,
}

impl IconFamily {
    /// Returns true if the icon family contains no icons nor any other
    /// elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns a list of all (non-mask) icon types for which the icon family
    /// contains the necessary element(s) for a complete icon image (including
    /// alpha channel).  These icon types can be passed to the
    /// [`get_icon_with_type`](#method.get_icon_with_type) method to decode the
    /// icons.
    pub fn available_icons(&self) -> Vec<IconType> {
        let mut result = Vec::new();
        for element in &self.elements {
            if let Some(icon_type) = element.icon_type() {
                if !icon_type.is_mask() && self.has_icon_with_type(icon_type) &&
                   !result.contains(&icon_type) {
                    result.push(icon_type);
                }
            }
        }
        result
    }

    /// Determines whether the icon family contains a complete icon with the
    /// given type (including the mask, if the given icon type has an
    /// associated mask type).
    pub fn has_icon_with_type(&self, icon_type: IconType) -> bool {
        if self.find_element(icon_type).is_err() {
            return false;
        } else if let Some(mask_type) = icon_type.mask_type() {
            return self.find_element(mask_type).is_ok();
        }
        true
    }

    /// Decodes an image from the family with the given icon type.  If the
    /// selected type has an associated mask type, the two elements will
    /// decoded together into a single image.  Returns an error if the
    /// element(s) for the selected type are not present in the icon family, or
    /// the if the encoded data is malformed.
    pub fn get_icon_with_type(&self, icon_type: IconType) -> io::Result<Image> {
        let element = self.find_element(icon_type)?;
        if let Some(mask_type) = icon_type.mask_type() {
            let mask = self.find_element(mask_type)?;
            element.decode_image_with_mask(mask)
        } else {
            element.decode_image()
        }
    }

    fn find_element(&self, icon_type: IconType) -> io::Result<&IconElement> {
        let ostype = icon_type.ostype();
        self.elements.iter().find(|el| el.ostype() == ostype).ok_or_else(|| {
            let msg = format!("the icon family does not contain a '{}' \
                               element",
                              ostype);
            Error::new(ErrorKind::NotFound, msg)
        })
    }

    /// Reads an icon family from an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconFamily> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != *ICNS_MAGIC_LITERAL {
            let msg = "not an icns file (wrong magic literal)";
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let file_length = reader.read_u32::<BigEndian>()?;
        let mut file_position: u32 = ICON_FAMILY_HEADER_LENGTH;
        let mut elements = Vec::new();
        while file_position < file_length {
            let element = IconElement::read(reader.by_ref())?;
            file_position += element.total_length();
            elements.push(element);
        }
        Ok(IconFamily { elements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icns::icontype::OSType;
    use crate::image::PixelFormat;
    use std::io::Cursor;

    #[test]
    fn read_icon_family_with_fake_elements() {
        let input: Cursor<&[u8]> =
            Cursor::new(b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#");
        let family = IconFamily::read(input).expect("read failed");
        assert_eq!(2, family.elements.len());
        assert_eq!(OSType(*b"quux"), family.elements[0].ostype());
        assert_eq!(6, family.elements[0].data().len());
        assert_eq!(OSType(*b"baz!"), family.elements[1].ostype());
        assert_eq!(1, family.elements[1].data().len());
        assert!(family.available_icons().is_empty());
    }

    #[test]
    fn read_rejects_wrong_magic() {
        let input: &[u8] = b"icnx\0\0\0\x08";
        assert!(IconFamily::read(input).is_err());
        assert!(!is_icns(input));
    }

    #[test]
    fn color_without_mask_is_incomplete() {
        let family = IconFamily {
            elements: vec![IconElement::new(OSType(*b"is32"), vec![0; 10])],
        };
        assert!(!family.has_icon_with_type(IconType::RGB24_16x16));
        assert!(family.available_icons().is_empty());
    }

    #[test]
    fn png_element_is_available() {
        let mut png = Vec::new();
        Image::new(PixelFormat::RGBA, 32, 32).write_png(&mut png).unwrap();
        let family = IconFamily {
            elements: vec![IconElement::new(OSType(*b"ic11"), png)],
        };
        assert_eq!(family.available_icons(), vec![IconType::RGBA32_16x16_2x]);
        let image = family.get_icon_with_type(IconType::RGBA32_16x16_2x)
            .expect("decode failed");
        assert_eq!(image.width(), 32);
    }
}
