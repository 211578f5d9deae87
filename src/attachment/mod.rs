//! Download widgets for attachments in generated documents.
//!
//! An attachment tag names a file and optional settings; rendering it
//! produces the icon (stored once in the site's icon directory) and the HTML
//! block that links to the file.

use std::io;
use std::path::Path;

use crate::error::IconError;
use crate::provider::IconProvider;
use crate::render::IconRenderer;

mod cache;
mod markup;
mod metadata;
mod widget;

pub use self::cache::{IconCache, Stored};
pub use self::markup::TagConfig;
pub use self::metadata::{iso_date, pretty_size, FileMetadata};
pub use self::widget::{render_widget, WidgetContext};

/// Rendering an attachment failed.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    /// Reading the attached file or writing its icon failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The icon could not be rendered and the tag asked for strict handling.
    #[error(transparent)]
    Icon(#[from] IconError),

    /// A tag setting could not be interpreted.
    #[error("invalid {key}: \"{value}\"")]
    InvalidValue {
        /// The setting's key.
        key: &'static str,
        /// The value as written.
        value: String,
    },
}

/// Renders an attachment tag: resolves and stores its icon, then returns the
/// widget HTML.
///
/// `source_dir` is the directory the tag's file path is relative to, and
/// `description_html` is the tag body already converted to HTML.  The size
/// and date come from the tag when given, otherwise from the file.
pub fn render_attachment<P: IconProvider>(tag: &TagConfig,
                                          source_dir: &Path,
                                          renderer: &IconRenderer<P>,
                                          cache: &IconCache,
                                          description_html: &str)
                                          -> Result<String, AttachmentError> {
    let full_path = source_dir.join(tag.file_path());
    let metadata = match (tag.size(), tag.modified_date()) {
        (Some(_), Some(_)) => None,
        _ => Some(FileMetadata::read(&full_path)?),
    };
    let size = tag.size()
        .map(str::to_string)
        .or_else(|| metadata.as_ref().map(FileMetadata::pretty_size))
        .unwrap_or_default();
    let date = match tag.modified_date() {
        Some(date) => iso_date(date).ok_or_else(|| AttachmentError::InvalidValue {
            key: "modified_date",
            value: date.to_string(),
        })?,
        None => metadata.as_ref().map(FileMetadata::iso_date).unwrap_or_default(),
    };

    let request = tag.icon_request(&full_path)?;
    let icon = renderer.render(&request)?;
    cache.store(&icon)?;

    Ok(render_widget(&WidgetContext {
        file_url: tag.file_path().to_string(),
        icon_url: cache.url_for(icon.name()),
        name: request.display_name,
        size,
        date,
        description_html: description_html.to_string(),
    }))
}
