use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Cursor, Error, ErrorKind, Read};

use super::icontype::{Encoding, IconType, OSType};
use crate::image::{Image, PixelFormat};
use crate::jp2io::is_jp2;
use crate::pngio::is_png;

/// The length of an icon element header, in bytes:
const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// Small RGBA icons may be stored as RLE-compressed ARGB channels behind
/// this tag instead of as PNG or JPEG 2000 data.
const ARGB_TAG: &[u8; 4] = b"ARGB";

/// One entry in an ICNS file.  Depending on the resource type, this may
/// represent an icon, or part of an icon (such as an alpha mask, or color
/// data without the mask).
pub struct IconElement {
    ostype: OSType,
    data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Decodes the icon element into an image.  Returns an error if this
    /// element does not represent an icon type supported by this library, or
    /// if the data is malformed.
    pub fn decode_image(&self) -> io::Result<Image> {
        let icon_type = self.icon_type().ok_or_else(|| {
            Error::new(ErrorKind::InvalidInput,
                       format!("unsupported OSType: {}", self.ostype))
        })?;
        let width = icon_type.pixel_width();
        let height = icon_type.pixel_height();
        match icon_type.encoding() {
            Encoding::JP2PNG => {
                let image = if self.data.starts_with(ARGB_TAG) {
                    let mut image = Image::new(PixelFormat::RGBA, width, height);
                    decode_rle(&self.data[ARGB_TAG.len()..],
                               &[3, 0, 1, 2],
                               image.data_mut())?;
                    image
                } else if is_png(&self.data) {
                    Image::read_png(Cursor::new(&self.data))?
                } else if is_jp2(&self.data) {
                    decode_jp2(&self.data)?
                } else {
                    let msg = format!("'{}' payload is neither PNG nor JPEG \
                                       2000 data",
                                      self.ostype);
                    return Err(Error::new(ErrorKind::InvalidData, msg));
                };
                if image.width() != width || image.height() != height {
                    let msg = format!("decoded image has wrong dimensions \
                                       ({}x{} instead of {}x{})",
                                      image.width(),
                                      image.height(),
                                      width,
                                      height);
                    return Err(Error::new(ErrorKind::InvalidData, msg));
                }
                Ok(image)
            }
            Encoding::RLE24 => {
                let mut data: &[u8] = &self.data;
                // 128x128 color data is preceded by four zero bytes.
                if icon_type == IconType::RGB24_128x128 &&
                   data.starts_with(&[0, 0, 0, 0]) {
                    data = &data[4..];
                }
                let mut image = Image::new(PixelFormat::RGB, width, height);
                decode_rle(data, &[0, 1, 2], image.data_mut())?;
                Ok(image)
            }
            Encoding::Mask8 => {
                let num_pixels = (width * height) as usize;
                if self.data.len() != num_pixels {
                    let msg = format!("wrong data payload length ({} \
                                       instead of {})",
                                      self.data.len(),
                                      num_pixels);
                    return Err(Error::new(ErrorKind::InvalidData, msg));
                }
                let mut image = Image::new(PixelFormat::Alpha, width, height);
                image.data_mut().clone_from_slice(&self.data);
                Ok(image)
            }
        }
    }

    /// Decodes this element's color data together with a separate alpha
    /// mask element into a single RGBA image.
    pub fn decode_image_with_mask(&self,
                                  mask: &IconElement)
                                  -> io::Result<Image> {
        let color = self.decode_image()?;
        let alpha = mask.decode_image()?;
        if alpha.pixel_format() != PixelFormat::Alpha {
            let msg = format!("'{}' is not a mask element", mask.ostype);
            return Err(Error::new(ErrorKind::InvalidInput, msg));
        }
        if color.width() != alpha.width() || color.height() != alpha.height() {
            let msg = format!("mask is {}x{} but color data is {}x{}",
                              alpha.width(),
                              alpha.height(),
                              color.width(),
                              color.height());
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let mut image = color.convert_to(PixelFormat::RGBA);
        for (pixel, &value) in image.data_mut()
            .chunks_exact_mut(4)
            .zip(alpha.data()) {
            pixel[3] = value;
        }
        Ok(image)
    }

    /// Returns the OSType for this element (e.g. `it32` or `t8mk`).
    pub fn ostype(&self) -> OSType {
        self.ostype
    }

    /// Returns the type of icon encoded by this element, or `None` if this
    /// element does not encode a supported icon type.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded data for this element.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ICON_ELEMENT_HEADER_LENGTH + (self.data.len() as u32)
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconElement> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype)?;
        let element_length = reader.read_u32::<BigEndian>()?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(Error::new(ErrorKind::InvalidData,
                                  "invalid element length"));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = Vec::new();
        reader.by_ref().take(data_length as u64).read_to_end(&mut data)?;
        if data.len() != data_length as usize {
            return Err(Error::new(ErrorKind::UnexpectedEof,
                                  "truncated icon element"));
        }
        Ok(IconElement::new(OSType(raw_ostype), data))
    }
}

#[cfg(feature = "jp2io")]
fn decode_jp2(data: &[u8]) -> io::Result<Image> {
    Image::read_jp2(data)
}

#[cfg(not(feature = "jp2io"))]
fn decode_jp2(_data: &[u8]) -> io::Result<Image> {
    Err(Error::new(ErrorKind::Unsupported,
                   "JPEG 2000 support is disabled (enable the jp2io feature)"))
}

/// Decodes channel-planar RLE data.  `channels[n]` is the output sample
/// offset that the n-th encoded channel is written to.
fn decode_rle(input: &[u8], channels: &[usize], output: &mut [u8]) -> io::Result<()> {
    let stride = channels.len();
    assert_eq!(output.len() % stride, 0);
    let num_pixels = output.len() / stride;
    let mut iter = input.iter();
    let mut remaining: usize = 0;
    let mut within_run = false;
    let mut run_value: u8 = 0;
    for &channel in channels {
        for pixel in 0..num_pixels {
            if remaining == 0 {
                let next: u8 = *iter.next().ok_or_else(rle_error)?;
                if next < 128 {
                    remaining = (next as usize) + 1;
                    within_run = false;
                } else {
                    remaining = (next as usize) - 125;
                    within_run = true;
                    run_value = *iter.next().ok_or_else(rle_error)?;
                }
            }
            output[stride * pixel + channel] = if within_run {
                run_value
            } else {
                *iter.next().ok_or_else(rle_error)?
            };
            remaining -= 1;
        }
        if remaining != 0 {
            return Err(rle_error());
        }
    }
    if iter.next().is_some() {
        Err(rle_error())
    } else {
        Ok(())
    }
}

fn rle_error() -> Error {
    Error::new(ErrorKind::InvalidData, "invalid RLE-compressed data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rle() {
        let data: Vec<u8> = vec![0, 12, 255, 0, 250, 0, 128, 34, 255, 0, 248,
                                 0, 1, 56, 99, 255, 0, 249, 0];
        let element = IconElement::new(OSType(*b"is32"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(image.pixel_format(), PixelFormat::RGB);
        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 16);
        assert_eq!(image.data()[0], 12);
        assert_eq!(image.data()[1], 34);
        assert_eq!(image.data()[2], 56);
    }

    #[test]
    fn decode_mask() {
        let mut data = vec![0u8; 256];
        data[2] = 127;
        let element = IconElement::new(OSType(*b"s8mk"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(image.pixel_format(), PixelFormat::Alpha);
        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 16);
        assert_eq!(image.data()[2], 127);
    }

    #[test]
    fn decode_color_with_mask() {
        // Every channel is a single 256-pixel run: 0x80 + 125 = 253, so two
        // runs of 128 each.
        let mut rle = Vec::new();
        for value in [10u8, 20, 30] {
            rle.extend_from_slice(&[0xfd, value, 0xfd, value]);
        }
        let color = IconElement::new(OSType(*b"is32"), rle);
        let mask = IconElement::new(OSType(*b"s8mk"), vec![77u8; 256]);
        let image = color.decode_image_with_mask(&mask)
            .expect("failed to decode image");
        assert_eq!(image.pixel_format(), PixelFormat::RGBA);
        assert_eq!(&image.data()[..4], &[10, 20, 30, 77]);
    }

    #[test]
    fn decode_argb_payload() {
        // 16x16 = 256 pixels per channel, two runs of 128 per channel.
        let mut data = b"ARGB".to_vec();
        for value in [255u8, 1, 2, 3] {
            data.extend_from_slice(&[0xfd, value, 0xfd, value]);
        }
        let element = IconElement::new(OSType(*b"icp4"), data);
        let image = element.decode_image().expect("failed to decode image");
        assert_eq!(image.pixel_format(), PixelFormat::RGBA);
        assert_eq!(&image.data()[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn png_payload_with_wrong_size_is_rejected() {
        let mut png = Vec::new();
        Image::new(PixelFormat::RGBA, 8, 8).write_png(&mut png).unwrap();
        let element = IconElement::new(OSType(*b"icp4"), png);
        assert!(element.decode_image().is_err());
    }

    #[test]
    fn read_truncated_element() {
        let input: &[u8] = b"quux\0\0\0\x0efoo";
        assert!(IconElement::read(input).is_err());
    }
}
