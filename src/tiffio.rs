use crate::image::{Image, PixelFormat};
use crate::representation::{RawIcon, Representation};
use std::io::{self, Cursor, Read, Seek};
use tiff::decoder::ifd::Value;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;

// Horizontal resolution of a 1x page, in pixels per inch.
const BASE_RESOLUTION: f64 = 72.0;

// ExtraSamples value for associated (premultiplied) alpha.
const ASSOCIATED_ALPHA: u16 = 1;

impl RawIcon {
    /// Decodes every page of a (possibly multi-page) TIFF file as one
    /// representation.  A page's density is its horizontal resolution over
    /// 72 dpi, so a 144 dpi page is a 2x representation; pages without a
    /// resolution are 1x.  Only 8-bit gray and RGB pages, with or without
    /// alpha, are supported.
    pub fn from_tiff_pages(data: &[u8]) -> io::Result<RawIcon> {
        let mut decoder = Decoder::new(Cursor::new(data)).map_err(tiff_error)?;
        let mut representations = Vec::new();
        loop {
            let (image, density) = read_page(&mut decoder)?;
            representations.push(Representation::with_density(image, density));
            if !decoder.more_images() {
                break;
            }
            decoder.next_image().map_err(tiff_error)?;
        }
        Ok(RawIcon::new(representations))
    }
}

fn read_page<R: Read + Seek>(decoder: &mut Decoder<R>)
                             -> io::Result<(Image, u32)> {
    let (width, height) = decoder.dimensions().map_err(tiff_error)?;
    let format = match decoder.colortype().map_err(tiff_error)? {
        ColorType::Gray(8) => PixelFormat::Gray,
        ColorType::GrayA(8) => PixelFormat::GrayAlpha,
        ColorType::RGB(8) => PixelFormat::RGB,
        ColorType::RGBA(8) => PixelFormat::RGBA,
        other => {
            return Err(io::Error::new(io::ErrorKind::InvalidData,
                                      format!("unsupported TIFF color type \
                                               {:?}",
                                              other)));
        }
    };
    let premultiplied = format.has_alpha() &&
        decoder.find_tag_unsigned::<u16>(Tag::ExtraSamples)
            .map_err(tiff_error)? == Some(ASSOCIATED_ALPHA);
    let density = match decoder.find_tag(Tag::XResolution)
        .map_err(tiff_error)? {
        Some(Value::Rational(num, den)) if den != 0 => {
            let ppi = num as f64 / den as f64;
            (ppi / BASE_RESOLUTION).round().max(1.0) as u32
        }
        _ => 1,
    };
    let mut data = match decoder.read_image().map_err(tiff_error)? {
        DecodingResult::U8(data) => data,
        _ => {
            return Err(io::Error::new(io::ErrorKind::InvalidData,
                                      "TIFF page is not 8-bit"));
        }
    };
    if premultiplied {
        unpremultiply(format, &mut data);
    }
    let image = Image::from_data(format, width, height, data).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "TIFF page is truncated")
    })?;
    Ok((image, density))
}

/// Divides the color samples of each pixel by its alpha (the last sample).
fn unpremultiply(format: PixelFormat, data: &mut [u8]) {
    let bpp = format.bytes_per_pixel() as usize;
    for pixel in data.chunks_exact_mut(bpp) {
        let (color, alpha) = pixel.split_at_mut(bpp - 1);
        let alpha = alpha[0] as u32;
        if alpha == 0 || alpha == 255 {
            continue;
        }
        for sample in color {
            *sample = ((*sample as u32 * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
}

fn tiff_error(err: tiff::TiffError) -> io::Error {
    match err {
        tiff::TiffError::IoError(err) => err,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, Rational, TiffEncoder};
    use tiff::tags::ResolutionUnit;

    fn page_data(size: u32, pixel: [u8; 4]) -> Vec<u8> {
        pixel.iter().copied().cycle().take((size * size * 4) as usize).collect()
    }

    fn write_pages(pages: &[(u32, u32, [u8; 4])], associated: bool) -> Vec<u8> {
        let mut output = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut output).unwrap();
            for &(size, ppi, pixel) in pages {
                let mut image =
                    encoder.new_image::<colortype::RGBA8>(size, size).unwrap();
                image.resolution(ResolutionUnit::Inch, Rational { n: ppi, d: 1 });
                if associated {
                    image.encoder()
                        .write_tag(Tag::ExtraSamples, ASSOCIATED_ALPHA)
                        .unwrap();
                }
                image.write_data(&page_data(size, pixel)).unwrap();
            }
        }
        output.into_inner()
    }

    #[test]
    fn every_page_becomes_a_representation() {
        let data = write_pages(&[(16, 72, [255, 0, 0, 255]),
                                 (32, 144, [0, 255, 0, 255]),
                                 (32, 72, [0, 0, 255, 255])],
                               false);
        let raw = RawIcon::from_tiff_pages(&data).unwrap();
        let reps: Vec<(u32, u32, f64)> = raw.representations()
            .iter()
            .map(|rep| (rep.pixel_width(), rep.density(), rep.width()))
            .collect();
        assert_eq!(reps, vec![(16, 1, 16.0), (32, 2, 16.0), (32, 1, 32.0)]);
        assert_eq!(&raw.representations()[1].image().data()[..4],
                   &[0, 255, 0, 255]);
    }

    #[test]
    fn associated_alpha_is_divided_out() {
        let data = write_pages(&[(4, 72, [64, 32, 0, 128])], true);
        let raw = RawIcon::from_tiff_pages(&data).unwrap();
        assert_eq!(&raw.representations()[0].image().data()[..4],
                   &[128, 64, 0, 128]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(RawIcon::from_tiff_pages(b"II*\0garbage").is_err());
        assert!(RawIcon::from_tiff_pages(b"not a tiff").is_err());
        assert!(RawIcon::from_tiff_pages(b"").is_err());
    }
}
