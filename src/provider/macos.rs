use std::path::Path;

use objc2::rc::autoreleasepool;
use objc2_app_kit::{NSImage, NSWorkspace};
use objc2_foundation::NSString;

use super::mime::extension_for_mime_type;
use super::IconProvider;
use crate::representation::RawIcon;

/// Asks the workspace icon service (`NSWorkspace`) for icons, the way
/// Finder shows them.
///
/// A workspace icon holds one image per size the system draws (including
/// the 2x "retina" ones); each becomes one representation, with its
/// density taken from the image's resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkspaceIcons;

impl WorkspaceIcons {
    /// Creates a provider using the shared workspace.
    pub fn new() -> WorkspaceIcons {
        WorkspaceIcons
    }
}

impl IconProvider for WorkspaceIcons {
    fn resolve_by_type(&self, file_type: &str) -> Option<RawIcon> {
        let file_type = workspace_type_name(file_type)?;
        autoreleasepool(|_| {
            let workspace = NSWorkspace::sharedWorkspace();
            #[allow(deprecated)]
            let icon = workspace.iconForFileType(&NSString::from_str(&file_type));
            raw_icon(&icon)
        })
    }

    fn resolve_by_file(&self, path: &Path) -> Option<RawIcon> {
        let path = path.to_str()?;
        autoreleasepool(|_| {
            let workspace = NSWorkspace::sharedWorkspace();
            let icon = workspace.iconForFile(&NSString::from_str(path));
            raw_icon(&icon)
        })
    }
}

/// Turns a file type argument into something `iconForFileType:` accepts:
/// extensions and uniform type identifiers pass through, MIME types become
/// their usual extension.
fn workspace_type_name(file_type: &str) -> Option<String> {
    let file_type = file_type.trim();
    let file_type = file_type.strip_prefix('.').unwrap_or(file_type);
    if file_type.is_empty() {
        return None;
    }
    if file_type.contains('/') {
        return extension_for_mime_type(file_type).map(str::to_string);
    }
    Some(file_type.to_string())
}

/// Rasterizes every image of a workspace icon into a multi-page TIFF and
/// decodes each page as one representation.
fn raw_icon(icon: &NSImage) -> Option<RawIcon> {
    let tiff = icon.TIFFRepresentation()?;
    match RawIcon::from_tiff_pages(&tiff.to_vec()) {
        Ok(raw) if !raw.is_empty() => Some(raw),
        Ok(_) => None,
        Err(err) => {
            log::debug!("unable to decode workspace icon: {}", err);
            None
        }
    }
}
