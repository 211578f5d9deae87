//! Reading Apple Icon Image (.icns) files.
//!
//! An ICNS file is the multi-resolution icon container used by macOS; each
//! complete icon in it becomes one representation of a
//! [`RawIcon`](crate::RawIcon).  See
//! https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file format.

mod element;
mod family;
mod icontype;

pub use self::element::IconElement;
pub use self::family::{is_icns, IconFamily};
pub use self::icontype::{Encoding, IconType, OSType};
