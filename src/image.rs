use image::DynamicImage;

/// A decoded bitmap with 8 bits per sample.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    pub(crate) format: PixelFormat,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Box<[u8]>,
}

impl Image {
    /// Creates a new image with all pixel data set to zero.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Image {
        let data_bytes = format.bytes_per_pixel() as usize
            * width as usize
            * height as usize;
        Image {
            format,
            width,
            height,
            data: vec![0u8; data_bytes].into_boxed_slice(),
        }
    }

    /// Creates an image from existing pixel data.  Returns `None` if the
    /// length of `data` does not match the format and dimensions.
    pub fn from_data(format: PixelFormat,
                     width: u32,
                     height: u32,
                     data: Vec<u8>)
                     -> Option<Image> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(format.bytes_per_pixel() as usize)?;
        if data.len() != expected {
            return None;
        }
        Some(Image {
            format,
            width,
            height,
            data: data.into_boxed_slice(),
        })
    }

    /// Converts a decoded `image` crate buffer, keeping its channel layout
    /// where there is an 8-bit equivalent and widening to RGBA otherwise.
    pub fn from_dynamic(image: DynamicImage) -> Image {
        let (format, width, height, data) = match image {
            DynamicImage::ImageLuma8(buf) => {
                (PixelFormat::Gray, buf.width(), buf.height(), buf.into_raw())
            }
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::GrayAlpha,
                                               buf.width(),
                                               buf.height(),
                                               buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => {
                (PixelFormat::RGB, buf.width(), buf.height(), buf.into_raw())
            }
            DynamicImage::ImageRgba8(buf) => {
                (PixelFormat::RGBA, buf.width(), buf.height(), buf.into_raw())
            }
            other => {
                let buf = other.to_rgba8();
                (PixelFormat::RGBA, buf.width(), buf.height(), buf.into_raw())
            }
        };
        Image {
            format,
            width,
            height,
            data: data.into_boxed_slice(),
        }
    }

    /// Returns a copy of this image in the given pixel format.  Color is
    /// reduced to luma with the Rec. 601 weights; missing alpha becomes
    /// fully opaque.
    pub fn convert_to(&self, format: PixelFormat) -> Image {
        if format == self.format {
            return self.clone();
        }
        let num_pixels = (self.width as usize) * (self.height as usize);
        let src_bpp = self.format.bytes_per_pixel() as usize;
        let mut data =
            Vec::with_capacity(num_pixels * format.bytes_per_pixel() as usize);
        for pixel in self.data.chunks_exact(src_bpp) {
            let (r, g, b, a) = self.format.unpack(pixel);
            match format {
                PixelFormat::RGBA => data.extend_from_slice(&[r, g, b, a]),
                PixelFormat::RGB => data.extend_from_slice(&[r, g, b]),
                PixelFormat::GrayAlpha => {
                    data.extend_from_slice(&[luma(r, g, b), a])
                }
                PixelFormat::Gray => data.push(luma(r, g, b)),
                PixelFormat::Alpha => data.push(a),
            }
        }
        Image {
            format,
            width: self.width,
            height: self.height,
            data: data.into_boxed_slice(),
        }
    }

    /// Returns the format in which this image's pixel data is stored.
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the image's pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the image's pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image, returning its pixel data.
    pub fn into_data(self) -> Vec<u8> {
        self.data.into_vec()
    }
}

/// A format for storing pixel data in an image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
    /// 32-bit color with alpha channel.
    RGBA,
    /// 24-bit color with no alpha.
    RGB,
    /// 16-bit grayscale-with-alpha.
    GrayAlpha,
    /// 8-bit grayscale with no alpha.
    Gray,
    /// 8-bit alpha mask with no color.
    Alpha,
}

impl PixelFormat {
    /// Returns the number of bits needed to store a single pixel in this
    /// format.
    pub fn bits_per_pixel(self) -> u32 {
        8 * self.bytes_per_pixel()
    }

    /// Returns the number of bytes needed to store a single pixel in this
    /// format.
    pub fn bytes_per_pixel(self) -> u32 {
        self.samples_per_pixel()
    }

    /// Returns the number of channels stored per pixel.
    pub fn samples_per_pixel(self) -> u32 {
        match self {
            PixelFormat::RGBA => 4,
            PixelFormat::RGB => 3,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Gray | PixelFormat::Alpha => 1,
        }
    }

    /// Returns true if pixels in this format carry an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self,
                 PixelFormat::RGBA | PixelFormat::GrayAlpha |
                 PixelFormat::Alpha)
    }

    /// Returns the color space that the color samples of this format live
    /// in.
    pub fn color_space(self) -> ColorSpace {
        match self {
            PixelFormat::RGBA | PixelFormat::RGB => ColorSpace::Rgb,
            PixelFormat::GrayAlpha | PixelFormat::Gray |
            PixelFormat::Alpha => ColorSpace::Gray,
        }
    }

    pub(crate) fn unpack(self, pixel: &[u8]) -> (u8, u8, u8, u8) {
        match self {
            PixelFormat::RGBA => (pixel[0], pixel[1], pixel[2], pixel[3]),
            PixelFormat::RGB => (pixel[0], pixel[1], pixel[2], u8::MAX),
            PixelFormat::GrayAlpha => (pixel[0], pixel[0], pixel[0], pixel[1]),
            PixelFormat::Gray => (pixel[0], pixel[0], pixel[0], u8::MAX),
            PixelFormat::Alpha => (0, 0, 0, pixel[0]),
        }
    }
}

/// The color space of an image's color samples.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColorSpace {
    /// Device gray.
    Gray,
    /// Device RGB.
    Rgb,
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}
