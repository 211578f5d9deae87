//! Library for rendering file icons for download widgets
//!
//! A request names where an icon comes from (an image file, a file type, or
//! a concrete file), the square size to render it at, and an output format.
//! The pipeline resolves the raw, multi-resolution icon from the host,
//! selects the representation closest to the target size, redraws it at
//! exactly that size, encodes it, and names the result after the MD5 digest
//! of the encoded bytes:
//!
//! ```no_run
//! use attachment_icon::{IconRenderer, IconRequest, IconSource};
//!
//! let renderer = IconRenderer::system();
//! let request = IconRequest::new(IconSource::FileTypeClass("pdf".into()))
//!     .with_size(32.0)
//!     .with_format("png")
//!     .with_strict_mode(true);
//! let icon = renderer.render(&request).expect("no icon for pdf");
//! println!("{} ({} bytes)", icon.name(), icon.bytes().len());
//! ```
//!
//! Non-strict requests never fail: errors are logged and a placeholder named
//! after the request's display name is returned instead.
//!
//! Host icons are read from freedesktop icon themes on Linux and from the
//! workspace icon service on macOS (see the [`provider`] module).  The
//! [`attachment`] module builds the download widget around a rendered icon.

#![warn(missing_docs)]

pub mod attachment;
mod config;
mod encode;
mod error;
pub mod icns;
mod image;
mod jp2io;
mod name;
mod normalize;
mod pngio;
pub mod provider;
mod render;
mod representation;
mod request;
mod resolve;
mod select;
mod tiffio;

pub use self::config::{RenderConfig, ResizeFilter, DEFAULT_MAX_CANVAS_SIZE};
pub use self::encode::{encode, EncodedBlob, JPEG_QUALITY};
pub use self::error::{EncodeError, IconError, RenderError, ResolutionError,
                      SelectionError};
pub use self::image::{ColorSpace, Image, PixelFormat};
pub use self::jp2io::is_jp2;
pub use self::name::{name, placeholder, IconName};
pub use self::normalize::{canvas_size, normalize, NormalizedCanvas};
pub use self::pngio::is_png;
pub use self::provider::IconProvider;
pub use self::render::{IconRenderer, RenderedIcon};
pub use self::representation::{RawIcon, Representation};
pub use self::request::{IconRequest, IconSource, OutputFormat,
                        DEFAULT_DISPLAY_NAME, DEFAULT_FORMAT_ALIAS,
                        DEFAULT_ICON_SIZE};
pub use self::resolve::{resolve, resolve_first};
pub use self::select::select;
