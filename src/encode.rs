use std::io::Cursor;

use image::codecs::bmp::BmpEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use tiff::encoder::compression::Lzw;
use tiff::encoder::{colortype, TiffEncoder};

use crate::error::EncodeError;
use crate::image::{ColorSpace, Image, PixelFormat};
use crate::normalize::NormalizedCanvas;
use crate::request::OutputFormat;

/// Quality factor for JPEG output.
pub const JPEG_QUALITY: u8 = 90;

/// A canvas serialized in one of the supported formats.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedBlob {
    bytes: Vec<u8>,
    format: OutputFormat,
}

impl EncodedBlob {
    /// Returns the encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the canonical format the bytes are encoded in.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Consumes the blob, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Serializes a canvas in the format named by `format_alias` (e.g. `png`,
/// `jpg`, `tif`).  Aliases of the same format produce identical bytes, and
/// encoding the same canvas twice produces identical bytes.
pub fn encode(canvas: &NormalizedCanvas,
              format_alias: &str)
              -> Result<EncodedBlob, EncodeError> {
    let format = OutputFormat::from_alias(format_alias)
        .ok_or_else(|| EncodeError::UnsupportedFormat(format_alias.to_string()))?;
    let image = canvas.image();
    let bytes = match format {
        OutputFormat::Png => encode_png(image),
        OutputFormat::Jpeg => encode_jpeg(image),
        OutputFormat::Gif => encode_gif(image),
        OutputFormat::Bmp => encode_bmp(image),
        OutputFormat::Tiff => encode_tiff(image),
        OutputFormat::Jpeg2000 => encode_jp2(image),
    };
    let bytes = bytes.map_err(|reason| {
        EncodeError::EncodingFailed { format: format.extension(), reason }
    })?;
    log::debug!("encoded {}x{} canvas as {} ({} bytes)",
                canvas.size(),
                canvas.size(),
                format,
                bytes.len());
    Ok(EncodedBlob { bytes, format })
}

fn encode_png(image: &Image) -> Result<Vec<u8>, String> {
    let mut output = Vec::new();
    image.write_png(&mut output).map_err(|e| e.to_string())?;
    Ok(output)
}

#[cfg(feature = "jp2io")]
fn encode_jp2(image: &Image) -> Result<Vec<u8>, String> {
    image.write_jp2().map_err(|e| e.to_string())
}

#[cfg(not(feature = "jp2io"))]
fn encode_jp2(_image: &Image) -> Result<Vec<u8>, String> {
    Err("built without the jp2io feature".to_string())
}

fn encode_jpeg(image: &Image) -> Result<Vec<u8>, String> {
    let flat = flatten_onto_white(image);
    let color = match flat.pixel_format() {
        PixelFormat::Gray => ExtendedColorType::L8,
        _ => ExtendedColorType::Rgb8,
    };
    let mut output = Vec::new();
    JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY)
        .encode(flat.data(), flat.width(), flat.height(), color)
        .map_err(|e| e.to_string())?;
    Ok(output)
}

fn encode_gif(image: &Image) -> Result<Vec<u8>, String> {
    let rgba = image.convert_to(PixelFormat::RGBA);
    let mut output = Vec::new();
    {
        // The trailer is written when the encoder is dropped.
        let mut encoder = GifEncoder::new(&mut output);
        encoder
            .encode(rgba.data(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
            .map_err(|e| e.to_string())?;
    }
    Ok(output)
}

fn encode_bmp(image: &Image) -> Result<Vec<u8>, String> {
    let image = match image.pixel_format() {
        PixelFormat::Alpha => image.convert_to(PixelFormat::GrayAlpha),
        _ => image.clone(),
    };
    let color = match image.pixel_format() {
        PixelFormat::RGBA => ExtendedColorType::Rgba8,
        PixelFormat::RGB => ExtendedColorType::Rgb8,
        PixelFormat::GrayAlpha | PixelFormat::Alpha => ExtendedColorType::La8,
        PixelFormat::Gray => ExtendedColorType::L8,
    };
    let mut output = Vec::new();
    BmpEncoder::new(&mut output)
        .encode(image.data(), image.width(), image.height(), color)
        .map_err(|e| e.to_string())?;
    Ok(output)
}

fn encode_tiff(image: &Image) -> Result<Vec<u8>, String> {
    let mut output = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut output).map_err(|e| e.to_string())?;
        let (width, height) = (image.width(), image.height());
        let result = match image.pixel_format() {
            PixelFormat::RGB => encoder
                .write_image_with_compression::<colortype::RGB8, _>(
                    width, height, Lzw::default(), image.data()),
            PixelFormat::Gray => encoder
                .write_image_with_compression::<colortype::Gray8, _>(
                    width, height, Lzw::default(), image.data()),
            PixelFormat::RGBA | PixelFormat::GrayAlpha | PixelFormat::Alpha => {
                let rgba = image.convert_to(PixelFormat::RGBA);
                encoder.write_image_with_compression::<colortype::RGBA8, _>(
                    width, height, Lzw::default(), rgba.data())
            }
        };
        result.map_err(|e| e.to_string())?;
    }
    Ok(output.into_inner())
}

/// Composites an image over an opaque white background, dropping its alpha
/// channel.  Gray images stay gray.
fn flatten_onto_white(image: &Image) -> Image {
    let format = image.pixel_format();
    if !format.has_alpha() {
        return image.clone();
    }
    let gray = format.color_space() == ColorSpace::Gray;
    let src_bpp = format.bytes_per_pixel() as usize;
    let mut data = Vec::with_capacity(image.data().len());
    for pixel in image.data().chunks_exact(src_bpp) {
        let (r, g, b, a) = format.unpack(pixel);
        if gray {
            data.push(over_white(r, a));
        } else {
            data.extend_from_slice(&[over_white(r, a),
                                     over_white(g, a),
                                     over_white(b, a)]);
        }
    }
    let out_format = if gray { PixelFormat::Gray } else { PixelFormat::RGB };
    // The length always matches the dimensions.
    Image::from_data(out_format, image.width(), image.height(), data)
        .unwrap_or_else(|| Image::new(out_format, image.width(), image.height()))
}

fn over_white(value: u8, alpha: u8) -> u8 {
    let (value, alpha) = (u32::from(value), u32::from(alpha));
    ((value * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}
