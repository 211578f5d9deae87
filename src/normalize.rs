use fast_image_resize as fr;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::image::{Image, PixelFormat};
use crate::representation::Representation;

/// A representation redrawn at exactly the requested square size.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedCanvas {
    image: Image,
}

impl NormalizedCanvas {
    /// Wraps a square image as a canvas.  Returns `None` if the image is not
    /// square.
    pub fn from_image(image: Image) -> Option<NormalizedCanvas> {
        if image.width() == image.height() {
            Some(NormalizedCanvas { image })
        } else {
            None
        }
    }

    /// Returns the edge length of the canvas, in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Returns the pixel format the canvas inherited from its source.
    pub fn pixel_format(&self) -> PixelFormat {
        self.image.pixel_format()
    }

    /// Returns the canvas bitmap.
    pub fn image(&self) -> &Image {
        &self.image
    }
}

/// Returns the canvas edge length for a target size: the size truncated to
/// whole pixels, or `None` if that is not a positive number of pixels.
pub fn canvas_size(target_size: f64) -> Option<u32> {
    if target_size.is_finite() && target_size >= 1.0 &&
       target_size <= f64::from(u32::MAX) {
        Some(target_size as u32)
    } else {
        None
    }
}

/// Redraws a representation into a new `target_size` by `target_size`
/// canvas with the same pixel format.
///
/// The representation is always redrawn, even when it already has the
/// target width: a high-density bitmap has more pixels than its nominal
/// width, and must be resampled onto the nominal grid.
pub fn normalize(rep: &Representation,
                 target_size: f64,
                 config: &RenderConfig)
                 -> Result<NormalizedCanvas, RenderError> {
    let size = canvas_size(target_size)
        .filter(|&size| size <= config.max_canvas_size)
        .ok_or_else(|| {
            RenderError::ContextUnavailable(format!(
                "cannot allocate a canvas of size {} (limit {})",
                target_size, config.max_canvas_size
            ))
        })?;

    let source = rep.image();
    if source.width() == 0 || source.height() == 0 {
        return Err(RenderError::ContextUnavailable("source bitmap is empty".to_string()));
    }
    let format = source.pixel_format();
    let pixel_type = pixel_type(format);
    let src_image = fr::images::Image::from_vec_u8(source.width(),
                                                   source.height(),
                                                   source.data().to_vec(),
                                                   pixel_type)
        .map_err(|e| RenderError::DrawFailed(format!("bad source bitmap: {}", e)))?;
    let mut dst_image = fr::images::Image::new(size, size, pixel_type);

    let options = fr::ResizeOptions::new().resize_alg(config.resize_filter.algorithm());
    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| RenderError::DrawFailed(e.to_string()))?;

    let image = Image::from_data(format, size, size, dst_image.into_vec())
        .ok_or_else(|| RenderError::DrawFailed("canvas has unexpected length".to_string()))?;
    log::debug!("redrew {}x{} {:?} bitmap onto {}x{} canvas ({})",
                rep.pixel_width(),
                rep.pixel_height(),
                format,
                size,
                size,
                config.resize_filter);
    Ok(NormalizedCanvas { image })
}

fn pixel_type(format: PixelFormat) -> fr::PixelType {
    match format {
        PixelFormat::RGBA => fr::PixelType::U8x4,
        PixelFormat::RGB => fr::PixelType::U8x3,
        PixelFormat::GrayAlpha => fr::PixelType::U8x2,
        PixelFormat::Gray | PixelFormat::Alpha => fr::PixelType::U8,
    }
}
