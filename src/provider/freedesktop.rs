use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use freedesktop_entry_parser::Entry;
use icon::{FileType, IconSearch, Icons, Theme};

use super::mime::{extension_of, mime_type_for_file_type};
use super::IconProvider;
use crate::image::Image;
use crate::representation::{RawIcon, Representation};

/// The theme every icon theme ultimately inherits from.
pub const FALLBACK_THEME: &str = "hicolor";

/// Icon names tried, in order, when a file's type has no icon of its own.
const GENERIC_FILE_ICONS: &[&str] =
    &["application-x-generic", "unknown", "text-x-generic"];

// Settings files that name the user's icon theme, most specific first, with
// the section and key holding the name.
const THEME_SETTINGS: &[(&str, &str, &str)] = &[
    ("gtk-4.0/settings.ini", "Settings", "gtk-icon-theme-name"),
    ("gtk-3.0/settings.ini", "Settings", "gtk-icon-theme-name"),
    ("kdeglobals", "Icons", "Theme"),
];

/// Looks icons up in freedesktop.org icon themes.
///
/// Lookups start in one theme and follow its `Inherits=` chain (which always
/// ends in `hicolor`), with each theme's directories taken from its
/// `index.theme`.  The first theme holding a PNG icon of the wanted name
/// supplies every size it has of that icon, one representation per theme
/// directory, with the directory's scale as the density.  Icons outside any
/// theme (in `pixmaps` directories) are used when no theme has the icon.
/// Scalable (SVG) and XPM icons are not loaded.
#[derive(Clone)]
pub struct ThemeIcons {
    icons: Arc<Icons>,
    theme: String,
}

impl ThemeIcons {
    /// Creates a provider searching the standard XDG locations (`~/.icons`,
    /// `$XDG_DATA_HOME/icons`, `$XDG_DATA_DIRS/icons`, and
    /// `/usr/share/pixmaps`), starting from the user's configured icon theme
    /// (see [`configured_theme`]).
    pub fn new() -> ThemeIcons {
        let theme = configured_theme()
            .unwrap_or_else(|| FALLBACK_THEME.to_string());
        log::debug!("looking up icons starting from theme {}", theme);
        ThemeIcons::from_icons(IconSearch::new().search().icons(), theme)
    }

    /// Creates a provider searching only the given base directories (each
    /// holding one directory per theme, plus icons that belong to no theme),
    /// starting from `hicolor`.
    pub fn with_base_dirs<I, P>(dirs: I) -> ThemeIcons
        where I: IntoIterator<Item = P>,
              P: Into<PathBuf>
    {
        let dirs = dirs.into_iter().map(Into::into).collect();
        ThemeIcons::from_icons(IconSearch::new_from(dirs).search().icons(),
                               FALLBACK_THEME.to_string())
    }

    fn from_icons(icons: Icons, theme: String) -> ThemeIcons {
        ThemeIcons { icons: Arc::new(icons), theme }
    }

    /// Starts lookups in the given theme (by directory name, e.g.
    /// `Papirus-Dark`).  An unknown theme falls back to `hicolor`.
    pub fn with_theme(mut self, theme: &str) -> ThemeIcons {
        self.theme = theme.to_string();
        self
    }

    /// Returns the theme lookups start in.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Returns the themes searched, in order: the starting theme followed by
    /// every theme it inherits from.
    pub fn theme_chain(&self) -> Vec<Arc<Theme>> {
        let start = match self.icons
            .theme(&self.theme)
            .or_else(|| self.icons.theme(FALLBACK_THEME)) {
            Some(theme) => theme,
            None => return Vec::new(),
        };
        let mut chain = Vec::with_capacity(start.inherits_from.len() + 1);
        chain.extend(start.inherits_from.iter().cloned());
        chain.insert(0, start);
        chain
    }

    /// Finds every size of the named icon in the first theme that has it.
    pub fn find_icon(&self, name: &str) -> Option<RawIcon> {
        for theme in self.theme_chain() {
            let representations = theme_representations(&theme, name);
            if !representations.is_empty() {
                log::debug!("found {} sizes of icon '{}' in theme {}",
                            representations.len(),
                            name,
                            theme.info.internal_name.to_string_lossy());
                return Some(RawIcon::new(representations));
            }
        }
        self.icons
            .find_standalone_icon(name)
            .filter(|file| file.file_type() == FileType::Png)
            .and_then(|file| load_png(file.path()))
            .map(|image| RawIcon::from(Representation::new(image)))
    }

    fn find_first(&self, names: &[String]) -> Option<RawIcon> {
        names.iter().find_map(|name| self.find_icon(name))
    }
}

impl Default for ThemeIcons {
    fn default() -> ThemeIcons {
        ThemeIcons::new()
    }
}

impl fmt::Debug for ThemeIcons {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.debug_struct("ThemeIcons")
            .field("theme", &self.theme)
            .field("themes_found", &self.icons.themes.len())
            .field("standalone_icons", &self.icons.standalone_icons.len())
            .finish()
    }
}

impl IconProvider for ThemeIcons {
    fn resolve_by_type(&self, file_type: &str) -> Option<RawIcon> {
        let names = match mime_type_for_file_type(file_type) {
            Some(mime) => icon_names_for_mime_type(&mime),
            None => vec![file_type.trim().to_string()],
        };
        self.find_first(&names)
    }

    fn resolve_by_file(&self, path: &Path) -> Option<RawIcon> {
        let mut names: Vec<String> = Vec::new();
        if path.is_dir() {
            names.push("folder".to_string());
            names.push("inode-directory".to_string());
        } else {
            let mime = extension_of(path)
                .and_then(|ext| mime_type_for_file_type(&ext));
            if let Some(mime) = mime {
                names.extend(icon_names_for_mime_type(&mime));
            }
            if is_executable(path) {
                names.push("application-x-executable".to_string());
            }
            names.extend(GENERIC_FILE_ICONS.iter().map(|name| name.to_string()));
        }
        self.find_first(&names)
    }
}

/// Reads the name of the user's icon theme from the GTK 4, GTK 3, or KDE
/// settings in the XDG config directories.
pub fn configured_theme() -> Option<String> {
    let dirs = xdg::BaseDirectories::new();
    THEME_SETTINGS.iter().find_map(|&(file, section, key)| {
        let path = dirs.find_config_file(file)?;
        let contents = fs::read(&path).ok()?;
        let theme = theme_from_settings(&contents, section, key);
        if let Some(theme) = &theme {
            log::debug!("{} names icon theme {}", path.display(), theme);
        }
        theme
    })
}

fn theme_from_settings(contents: &[u8],
                       section: &str,
                       key: &str)
                       -> Option<String> {
    let entry = match Entry::parse(contents) {
        Ok(entry) => entry,
        Err(err) => {
            log::debug!("ignoring unparsable settings: {}", err);
            return None;
        }
    };
    entry.get(section, key)?
        .first()
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Icon names for a MIME type, most specific first: the type's own icon
/// (`application-pdf`), then the generic icon of its media type
/// (`text-x-generic` for `text/*`).
fn icon_names_for_mime_type(mime: &str) -> Vec<String> {
    let mut names = vec![mime.replace('/', "-")];
    let media_type = mime.split('/').next().unwrap_or(mime);
    let generic = match media_type {
        "text" => Some("text-x-generic"),
        "image" => Some("image-x-generic"),
        "audio" => Some("audio-x-generic"),
        "video" => Some("video-x-generic"),
        "font" => Some("font-x-generic"),
        _ => None,
    };
    if let Some(generic) = generic {
        names.push(generic.to_string());
    }
    names
}

/// Loads the PNG version of an icon from every directory of one theme,
/// smallest first.
fn theme_representations(theme: &Theme, name: &str) -> Vec<Representation> {
    let file_name = format!("{}.png", name);
    let mut representations = Vec::new();
    for dir in &theme.info.index.directories {
        let image = theme.info
            .base_dirs
            .iter()
            .map(|base| base.join(&dir.directory_name).join(&file_name))
            .filter(|path| path.is_file())
            .find_map(|path| load_png(&path));
        if let Some(image) = image {
            representations.push(Representation::with_density(image,
                                                              dir.scale.max(1)));
        }
    }
    representations.sort_by_key(|rep| (rep.pixel_width(), rep.density()));
    representations
}

fn load_png(path: &Path) -> Option<Image> {
    let file = File::open(path).ok()?;
    match Image::read_png(BufReader::new(file)) {
        Ok(image) => Some(image),
        Err(err) => {
            log::debug!("ignoring unreadable icon {}: {}", path.display(), err);
            None
        }
    }
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
