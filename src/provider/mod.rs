//! Obtaining raw icons from the host environment.
//!
//! Only this part of the pipeline is platform specific.  [`IconProvider`]
//! is the capability set the resolver needs; [`SystemIcons`] is the
//! implementation for the current target:
//!
//! * Linux and other Unix systems: [`ThemeIcons`], which looks icons up in
//!   freedesktop icon themes, starting from the user's configured theme.
//! * macOS: [`WorkspaceIcons`], which asks `NSWorkspace` for the icon of a
//!   file or file type.
//! * Everything else: [`NoHostIcons`], which only loads explicit image
//!   files.

use std::io;
use std::path::Path;

use crate::representation::RawIcon;

#[cfg(all(unix, not(target_os = "macos")))]
mod freedesktop;
#[cfg(target_os = "macos")]
mod macos;
mod mime;

#[cfg(all(unix, not(target_os = "macos")))]
pub use self::freedesktop::{configured_theme, ThemeIcons, FALLBACK_THEME};
#[cfg(target_os = "macos")]
pub use self::macos::WorkspaceIcons;
pub use self::mime::{extension_for_mime_type, extension_of,
                     mime_type_for_extension};

/// The host icon provider for the current target.
#[cfg(all(unix, not(target_os = "macos")))]
pub type SystemIcons = ThemeIcons;

/// The host icon provider for the current target.
#[cfg(target_os = "macos")]
pub type SystemIcons = WorkspaceIcons;

/// The host icon provider for the current target.
#[cfg(not(unix))]
pub type SystemIcons = NoHostIcons;

/// The ways a host can supply a raw icon.
pub trait IconProvider {
    /// Loads the image file at `path` as an icon.
    fn resolve_by_path(&self, path: &Path) -> io::Result<RawIcon> {
        RawIcon::open(path)
    }

    /// Returns the generic icon for a file type: an extension (`pdf`), a
    /// MIME type (`application/pdf`), or a host-specific type name.
    fn resolve_by_type(&self, file_type: &str) -> Option<RawIcon>;

    /// Returns the icon for a concrete file, falling back to the generic
    /// icon of its type.
    fn resolve_by_file(&self, path: &Path) -> Option<RawIcon>;
}

impl<P: IconProvider + ?Sized> IconProvider for &P {
    fn resolve_by_path(&self, path: &Path) -> io::Result<RawIcon> {
        (**self).resolve_by_path(path)
    }

    fn resolve_by_type(&self, file_type: &str) -> Option<RawIcon> {
        (**self).resolve_by_type(file_type)
    }

    fn resolve_by_file(&self, path: &Path) -> Option<RawIcon> {
        (**self).resolve_by_file(path)
    }
}

impl<P: IconProvider + ?Sized> IconProvider for Box<P> {
    fn resolve_by_path(&self, path: &Path) -> io::Result<RawIcon> {
        (**self).resolve_by_path(path)
    }

    fn resolve_by_type(&self, file_type: &str) -> Option<RawIcon> {
        (**self).resolve_by_type(file_type)
    }

    fn resolve_by_file(&self, path: &Path) -> Option<RawIcon> {
        (**self).resolve_by_file(path)
    }
}

/// A provider for hosts without an icon service.  Explicit image paths
/// still load; type and file lookups always come back empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHostIcons;

impl IconProvider for NoHostIcons {
    fn resolve_by_type(&self, _file_type: &str) -> Option<RawIcon> {
        None
    }

    fn resolve_by_file(&self, _path: &Path) -> Option<RawIcon> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_host_icons_only_loads_files() {
        let provider = NoHostIcons;
        assert!(provider.resolve_by_type("pdf").is_none());
        assert!(provider.resolve_by_file(Path::new("a.pdf")).is_none());
        assert!(provider.resolve_by_path(Path::new("/nonexistent/icon.png"))
            .is_err());
    }

    #[test]
    fn boxed_provider_delegates() {
        let provider: Box<dyn IconProvider> = Box::new(NoHostIcons);
        assert!(provider.resolve_by_type("pdf").is_none());
    }
}
