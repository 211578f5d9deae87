use std::fmt;
use std::str::FromStr;

/// Default upper bound on the edge length of a rendered icon, in pixels.
pub const DEFAULT_MAX_CANVAS_SIZE: u32 = 4096;

/// Settings shared by every render of an [`IconRenderer`](crate::IconRenderer).
///
/// Encoding parameters (quality factor, TIFF compression) are fixed and not
/// part of the configuration, so that a given canvas always encodes to the
/// same bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Resampling filter used when redrawing a representation.
    pub resize_filter: ResizeFilter,
    /// Largest edge length, in pixels, a canvas may be allocated with.
    pub max_canvas_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resize_filter: ResizeFilter::Lanczos3,
            max_canvas_size: DEFAULT_MAX_CANVAS_SIZE,
        }
    }
}

/// Resampling filters for redrawing icons.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ResizeFilter {
    /// Nearest-neighbor sampling; keeps hard pixel edges.
    Nearest,
    /// Bilinear interpolation.
    Bilinear,
    /// Catmull-Rom cubic interpolation.
    CatmullRom,
    /// Lanczos windowed sinc with three lobes.
    Lanczos3,
}

impl ResizeFilter {
    /// Returns the stable name of this filter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::CatmullRom => "catmull-rom",
            Self::Lanczos3 => "lanczos3",
        }
    }

    pub(crate) fn algorithm(self) -> fast_image_resize::ResizeAlg {
        use fast_image_resize::{FilterType, ResizeAlg};
        match self {
            Self::Nearest => ResizeAlg::Nearest,
            Self::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
            Self::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
            Self::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.as_str())
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, String> {
        match name.trim().to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "triangle" => Ok(Self::Bilinear),
            "catmull-rom" | "catmullrom" => Ok(Self::CatmullRom),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(format!(
                "unknown resize filter: {} (expected nearest, bilinear, \
                 catmull-rom, or lanczos3)",
                other
            )),
        }
    }
}
