use std::fs;
use std::io::{self, Cursor, Error, ErrorKind};
use std::path::Path;

use crate::icns::{is_icns, IconFamily};
use crate::image::{ColorSpace, Image};

/// One fixed-resolution bitmap within a multi-resolution icon.
#[derive(Clone, Debug, PartialEq)]
pub struct Representation {
    image: Image,
    density: u32,
}

impl Representation {
    /// Creates a representation of a bitmap drawn at 1x density.
    pub fn new(image: Image) -> Representation {
        Representation::with_density(image, 1)
    }

    /// Creates a representation of a bitmap drawn at the given pixel density
    /// (2 for "retina" bitmaps).  A density of zero is treated as 1.
    pub fn with_density(image: Image, density: u32) -> Representation {
        Representation {
            image,
            density: density.max(1),
        }
    }

    /// Returns the nominal width, in points: the pixel width divided by the
    /// pixel density.  This is the width representations are selected by.
    pub fn width(&self) -> f64 {
        f64::from(self.image.width()) / f64::from(self.density)
    }

    /// Returns the nominal height, in points.
    pub fn height(&self) -> f64 {
        f64::from(self.image.height()) / f64::from(self.density)
    }

    /// Returns the width of the bitmap, in pixels.
    pub fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    /// Returns the height of the bitmap, in pixels.
    pub fn pixel_height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the pixel density the bitmap was drawn at.
    pub fn density(&self) -> u32 {
        self.density
    }

    /// Returns the number of bits in each sample.
    pub fn bits_per_sample(&self) -> u32 {
        self.image.pixel_format().bits_per_pixel() /
        self.image.pixel_format().samples_per_pixel()
    }

    /// Returns the number of samples in each pixel.
    pub fn samples_per_pixel(&self) -> u32 {
        self.image.pixel_format().samples_per_pixel()
    }

    /// Returns true if the bitmap has an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.pixel_format().has_alpha()
    }

    /// Returns the color space of the bitmap.
    pub fn color_space(&self) -> ColorSpace {
        self.image.pixel_format().color_space()
    }

    /// Returns the bitmap.
    pub fn image(&self) -> &Image {
        &self.image
    }
}

/// A multi-resolution icon as obtained from the host, before a
/// representation has been selected from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawIcon {
    representations: Vec<Representation>,
}

impl RawIcon {
    /// Creates a raw icon from its representations, in host order.
    pub fn new(representations: Vec<Representation>) -> RawIcon {
        RawIcon { representations }
    }

    /// Loads a raw icon from an image file.  See
    /// [`from_bytes`](#method.from_bytes) for the supported formats.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<RawIcon> {
        let data = fs::read(path)?;
        RawIcon::from_bytes(&data)
    }

    /// Decodes a raw icon from the contents of an image file.  ICNS files
    /// give one representation per complete icon they contain; JPEG 2000
    /// files, and everything the `image` crate decodes (PNG, JPEG, GIF, BMP,
    /// TIFF, ICO), give a single representation.
    pub fn from_bytes(data: &[u8]) -> io::Result<RawIcon> {
        if is_icns(data) {
            let family = IconFamily::read(Cursor::new(data))?;
            return Ok(RawIcon::from_icon_family(&family));
        }
        if crate::jp2io::is_jp2(data) {
            return read_jp2(data).map(|image| RawIcon::from(Representation::new(image)));
        }
        let decoded = image::load_from_memory(data)
            .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
        Ok(RawIcon::from(Representation::new(Image::from_dynamic(decoded))))
    }

    /// Decodes every complete icon in an ICNS icon family.  Icons that fail
    /// to decode are skipped.
    pub fn from_icon_family(family: &IconFamily) -> RawIcon {
        let mut representations = Vec::new();
        for icon_type in family.available_icons() {
            match family.get_icon_with_type(icon_type) {
                Ok(image) => {
                    representations.push(Representation::with_density(
                        image,
                        icon_type.pixel_density(),
                    ));
                }
                Err(err) => {
                    log::debug!("skipping '{}' icon: {}", icon_type.ostype(), err);
                }
            }
        }
        RawIcon { representations }
    }

    /// Returns the representations, in host order.
    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    /// Returns true if the icon has no representations.
    pub fn is_empty(&self) -> bool {
        self.representations.is_empty()
    }

    /// Returns the number of representations.
    pub fn len(&self) -> usize {
        self.representations.len()
    }

    /// Consumes the icon, returning its representations.
    pub fn into_representations(self) -> Vec<Representation> {
        self.representations
    }
}

impl From<Representation> for RawIcon {
    fn from(representation: Representation) -> RawIcon {
        RawIcon { representations: vec![representation] }
    }
}

impl FromIterator<Representation> for RawIcon {
    fn from_iter<I: IntoIterator<Item = Representation>>(iter: I) -> RawIcon {
        RawIcon { representations: iter.into_iter().collect() }
    }
}

#[cfg(feature = "jp2io")]
fn read_jp2(data: &[u8]) -> io::Result<Image> {
    Image::read_jp2(data)
}

#[cfg(not(feature = "jp2io"))]
fn read_jp2(_data: &[u8]) -> io::Result<Image> {
    Err(Error::new(ErrorKind::Unsupported,
                   "JPEG 2000 support is disabled (enable the jp2io feature)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelFormat;
    use byteorder::{BigEndian, WriteBytesExt};

    fn png_bytes(format: PixelFormat, size: u32) -> Vec<u8> {
        let mut data = Vec::new();
        Image::new(format, size, size).write_png(&mut data).unwrap();
        data
    }

    #[test]
    fn retina_width_is_nominal() {
        let image = Image::new(PixelFormat::RGBA, 128, 128);
        let rep = Representation::with_density(image, 2);
        assert_eq!(rep.width(), 64.0);
        assert_eq!(rep.pixel_width(), 128);
        assert_eq!(rep.bits_per_sample(), 8);
        assert_eq!(rep.samples_per_pixel(), 4);
        assert!(rep.has_alpha());
        assert_eq!(rep.color_space(), ColorSpace::Rgb);
    }

    #[test]
    fn png_file_gives_one_representation() {
        let raw = RawIcon::from_bytes(&png_bytes(PixelFormat::Gray, 24))
            .expect("decode failed");
        assert_eq!(raw.len(), 1);
        let rep = &raw.representations()[0];
        assert_eq!(rep.width(), 24.0);
        assert_eq!(rep.color_space(), ColorSpace::Gray);
    }

    #[test]
    fn icns_file_gives_every_icon() {
        let mut elements = Vec::new();
        for (ostype, size) in [(b"icp4", 16u32), (b"ic07", 128), (b"ic13", 256)] {
            let payload = png_bytes(PixelFormat::RGBA, size);
            elements.extend_from_slice(ostype);
            elements.write_u32::<BigEndian>(payload.len() as u32 + 8).unwrap();
            elements.extend_from_slice(&payload);
        }
        let mut data = b"icns".to_vec();
        data.write_u32::<BigEndian>(elements.len() as u32 + 8).unwrap();
        data.extend_from_slice(&elements);

        let raw = RawIcon::from_bytes(&data).expect("decode failed");
        let widths: Vec<f64> =
            raw.representations().iter().map(Representation::width).collect();
        assert_eq!(widths, vec![16.0, 128.0, 128.0]);
        assert_eq!(raw.representations()[2].density(), 2);
    }

    #[test]
    fn undecodable_bytes_fail() {
        assert!(RawIcon::from_bytes(b"definitely not an image").is_err());
    }
}
