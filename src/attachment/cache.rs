use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::name::IconName;
use crate::render::RenderedIcon;

/// What [`IconCache::store`] did with an icon.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stored {
    /// The icon was written.
    Written,
    /// A file with the icon's name already existed and was left alone.
    AlreadyPresent,
    /// The icon is a placeholder and was not written.
    Skipped,
}

/// The directory rendered icons are published in.
///
/// Icon names are content addressed, so a file that already exists under an
/// icon's name already holds that icon and is never rewritten.
#[derive(Clone, Debug)]
pub struct IconCache {
    destination: PathBuf,
    base_url: String,
}

impl IconCache {
    /// Creates a cache for a site generated into `destination` and served
    /// under `base_url`.
    pub fn new<P: Into<PathBuf>>(destination: P, base_url: &str) -> IconCache {
        IconCache {
            destination: destination.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the directory icons are written to.
    pub fn icon_dir(&self) -> PathBuf {
        self.destination
            .join(self.base_url.trim_start_matches('/'))
            .join("icons")
    }

    /// Returns where the icon with the given name is stored.
    pub fn path_for(&self, name: &IconName) -> PathBuf {
        self.icon_dir().join(name.to_string())
    }

    /// Returns the URL the icon with the given name is served at.
    pub fn url_for(&self, name: &IconName) -> String {
        format!("{}/icons/{}", self.base_url, name)
    }

    /// Writes a rendered icon into the cache unless it is a placeholder or
    /// already present.  Concurrent stores of the same icon are safe: the
    /// bytes go to a temporary file that is moved into place only if
    /// nothing is there yet.
    pub fn store(&self, icon: &RenderedIcon) -> io::Result<Stored> {
        if icon.is_placeholder() {
            return Ok(Stored::Skipped);
        }
        let path = self.path_for(icon.name());
        if path.exists() {
            return Ok(Stored::AlreadyPresent);
        }
        let dir = self.icon_dir();
        fs::create_dir_all(&dir)?;
        let stored = write_new(&dir, &path, icon.bytes())?;
        if stored == Stored::Written {
            log::debug!("wrote {}", path.display());
        }
        Ok(stored)
    }
}

fn write_new(dir: &Path, path: &Path, bytes: &[u8]) -> io::Result<Stored> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    match file.persist_noclobber(path) {
        Ok(_) => Ok(Stored::Written),
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            Ok(Stored::AlreadyPresent)
        }
        Err(err) => Err(err.error),
    }
}
