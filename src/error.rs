//! Error types for each pipeline stage.
//!
//! Every stage reports its own error type so that stages can be used and
//! tested on their own; [`IconError`] wraps whichever stage failed first.

use std::path::PathBuf;

/// No source icon could be obtained for a request.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// The explicit image path does not exist or is not a decodable image.
    #[error("unable to load image at path: {}", .0.display())]
    LoadFailed(PathBuf),

    /// The host has no icon registered for the file type.
    #[error("unable to get icon for file type: {0}")]
    NoIconForType(String),

    /// The host has no icon for the file, nor for its type.
    #[error("unable to get icon for file: {}", .0.display())]
    NoIconForPath(PathBuf),
}

/// The raw icon contained no representation to start from.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// The raw icon has no representations at all.
    #[error("unable to find a usable icon representation")]
    NoUsableRepresentation,
}

/// Redrawing the selected representation at the target size failed.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A canvas of the requested size could not be set up for drawing.
    #[error("unable to generate drawing context: {0}")]
    ContextUnavailable(String),

    /// Drawing into the canvas reported failure.
    #[error("unable to draw representation: {0}")]
    DrawFailed(String),
}

/// The canvas could not be serialized in the requested format.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The requested format alias is not one of the supported formats.
    #[error("unsupported format \"{0}\"")]
    UnsupportedFormat(String),

    /// The encoder for a supported format failed.
    #[error("unable to encode {format}: {reason}")]
    EncodingFailed {
        /// Canonical extension of the format that failed.
        format: &'static str,
        /// The encoder's error message.
        reason: String,
    },
}

/// The first failure of a rendering pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// Resolving the icon source failed.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Selecting a representation failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Redrawing at the target size failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
