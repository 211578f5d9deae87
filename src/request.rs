use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The icon size used when a request does not name one.
pub const DEFAULT_ICON_SIZE: f64 = 64.0;

/// The format alias used when a request does not name one.
pub const DEFAULT_FORMAT_ALIAS: &str = "png";

/// The display name used when a request does not name one.
pub const DEFAULT_DISPLAY_NAME: &str = "UNKNOWN";

/// One of the raster formats icons can be encoded in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OutputFormat {
    /// Windows bitmap.
    Bmp,
    /// GIF, quantized to a 256-color palette.
    Gif,
    /// Baseline JPEG.
    Jpeg,
    /// JPEG 2000.
    Jpeg2000,
    /// PNG.
    Png,
    /// TIFF with LZW compression.
    Tiff,
}

impl OutputFormat {
    /// Looks up the canonical format for a format alias such as `jpg` or
    /// `tif`.  Matching ignores case and a leading dot.
    ///
    /// # Examples
    /// ```
    /// use attachment_icon::OutputFormat;
    /// assert_eq!(OutputFormat::from_alias("JPE"), Some(OutputFormat::Jpeg));
    /// assert_eq!(OutputFormat::from_alias(".tif"), Some(OutputFormat::Tiff));
    /// assert_eq!(OutputFormat::from_alias("webp"), None);
    /// ```
    pub fn from_alias(alias: &str) -> Option<OutputFormat> {
        let alias = alias.trim();
        let alias = alias.strip_prefix('.').unwrap_or(alias);
        match alias.to_ascii_lowercase().as_str() {
            "bmp" => Some(OutputFormat::Bmp),
            "gif" => Some(OutputFormat::Gif),
            "jpg" | "jpe" | "jpeg" => Some(OutputFormat::Jpeg),
            "jp2" | "jpf" => Some(OutputFormat::Jpeg2000),
            "png" => Some(OutputFormat::Png),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            _ => None,
        }
    }

    /// Returns the canonical lowercase file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Jpeg2000 => "jp2",
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<OutputFormat, String> {
        OutputFormat::from_alias(input)
            .ok_or_else(|| format!("unsupported format \"{}\"", input))
    }
}

/// Where the icon for a request comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IconSource {
    /// An image file to use as the icon.
    ExplicitImagePath(PathBuf),
    /// A file type or class (an extension, a MIME type, or a host-specific
    /// type name) whose generic icon should be used.
    FileTypeClass(String),
    /// A concrete file whose icon should be used.
    FilePath(PathBuf),
}

impl IconSource {
    /// Collects the populated candidate settings in precedence order: an
    /// explicit image path, then a file type, then a file path.  Empty values
    /// are skipped.
    pub fn candidates(image_path: Option<&str>,
                      file_type: Option<&str>,
                      file_path: Option<&Path>)
                      -> Vec<IconSource> {
        let mut sources = Vec::with_capacity(3);
        if let Some(path) = non_empty(image_path) {
            sources.push(IconSource::ExplicitImagePath(PathBuf::from(path)));
        }
        if let Some(file_type) = non_empty(file_type) {
            sources.push(IconSource::FileTypeClass(file_type.to_string()));
        }
        if let Some(path) = file_path.filter(|path| !path.as_os_str().is_empty()) {
            sources.push(IconSource::FilePath(path.to_path_buf()));
        }
        sources
    }

    /// Picks the highest-precedence populated candidate.  Returns `None` if
    /// every candidate is missing or empty.
    pub fn first_of(image_path: Option<&str>,
                    file_type: Option<&str>,
                    file_path: Option<&Path>)
                    -> Option<IconSource> {
        IconSource::candidates(image_path, file_type, file_path)
            .into_iter()
            .next()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl fmt::Display for IconSource {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IconSource::ExplicitImagePath(path) => {
                write!(out, "image {}", path.display())
            }
            IconSource::FileTypeClass(file_type) => {
                write!(out, "file type {}", file_type)
            }
            IconSource::FilePath(path) => write!(out, "file {}", path.display()),
        }
    }
}

/// A request for one rendered icon.
#[derive(Clone, Debug, PartialEq)]
pub struct IconRequest {
    /// Edge length of the square output, in pixels.
    pub target_size: f64,
    /// The requested output format alias, e.g. `png` or `jpg`.
    pub output_format: String,
    /// Whether failures abort the render instead of degrading to a
    /// placeholder.
    pub strict_mode: bool,
    /// Where the icon comes from.
    pub source: IconSource,
    /// Lower-precedence sources, tried in order while resolution fails.
    pub fallback_sources: Vec<IconSource>,
    /// Name used for diagnostics and placeholder results.
    pub display_name: String,
}

impl IconRequest {
    /// Creates a request for the given source with default size, format,
    /// display name, and non-strict error handling.
    pub fn new(source: IconSource) -> IconRequest {
        IconRequest {
            target_size: DEFAULT_ICON_SIZE,
            output_format: DEFAULT_FORMAT_ALIAS.to_string(),
            strict_mode: false,
            source,
            fallback_sources: Vec::new(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
        }
    }

    /// Sets the target size, in pixels.
    pub fn with_size(mut self, target_size: f64) -> IconRequest {
        self.target_size = target_size;
        self
    }

    /// Sets the output format alias.
    pub fn with_format(mut self, alias: &str) -> IconRequest {
        self.output_format = alias.to_string();
        self
    }

    /// Builds a request from ordered candidate sources: the first becomes
    /// the source and the rest its fallbacks.  Returns `None` for an empty
    /// list.
    pub fn from_candidates(candidates: Vec<IconSource>) -> Option<IconRequest> {
        let mut candidates = candidates.into_iter();
        let source = candidates.next()?;
        let mut request = IconRequest::new(source);
        request.fallback_sources = candidates.collect();
        Some(request)
    }

    /// Sets strict (fail-fast) error handling.
    pub fn with_strict_mode(mut self, strict_mode: bool) -> IconRequest {
        self.strict_mode = strict_mode;
        self
    }

    /// Appends a source to try if every earlier one fails to resolve.
    pub fn with_fallback(mut self, source: IconSource) -> IconRequest {
        self.fallback_sources.push(source);
        self
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: &str) -> IconRequest {
        self.display_name = name.to_string();
        self
    }

    /// Returns the canonical output format, if the alias is recognized.
    pub fn format(&self) -> Option<OutputFormat> {
        OutputFormat::from_alias(&self.output_format)
    }

    /// Returns the extension for names derived from this request: the
    /// canonical extension if the format alias is known, otherwise the alias
    /// itself in lowercase.
    pub fn extension(&self) -> String {
        match self.format() {
            Some(format) => format.extension().to_string(),
            None => {
                let alias = self.output_format.trim();
                alias.strip_prefix('.').unwrap_or(alias).to_ascii_lowercase()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_aliases_share_canonical_format() {
        for alias in ["jpg", "jpe", "jpeg"] {
            let format = OutputFormat::from_alias(alias).unwrap();
            assert_eq!(format, OutputFormat::Jpeg);
            assert_eq!(format.extension(), "jpeg");
        }
    }

    #[test]
    fn every_alias_maps_to_a_format() {
        let expected = [("bmp", "bmp"),
                        ("gif", "gif"),
                        ("jp2", "jp2"),
                        ("jpf", "jp2"),
                        ("png", "png"),
                        ("tif", "tiff"),
                        ("TIFF", "tiff")];
        for (alias, extension) in expected {
            let format: OutputFormat = alias.parse().unwrap();
            assert_eq!(format.extension(), extension);
        }
        assert!("svg".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn source_precedence() {
        let path = Path::new("/tmp/report.pdf");
        assert_eq!(IconSource::first_of(Some("icon.png"), Some("pdf"),
                                        Some(path)),
                   Some(IconSource::ExplicitImagePath("icon.png".into())));
        assert_eq!(IconSource::first_of(None, Some("pdf"), Some(path)),
                   Some(IconSource::FileTypeClass("pdf".to_string())));
        assert_eq!(IconSource::first_of(Some("  "), None, Some(path)),
                   Some(IconSource::FilePath(path.to_path_buf())));
        assert_eq!(IconSource::first_of(None, None, None), None);
    }

    #[test]
    fn first_of_borrows_from_its_arguments() {
        let settings = vec![String::from(" icon.png "), String::from("pdf")];
        let source = IconSource::first_of(settings.first().map(String::as_str),
                                          settings.get(1).map(String::as_str),
                                          None);
        drop(settings);
        assert_eq!(source,
                   Some(IconSource::ExplicitImagePath("icon.png".into())));
    }

    #[test]
    fn candidates_keep_precedence_order() {
        let path = Path::new("/tmp/report.pdf");
        assert_eq!(IconSource::candidates(Some("missing.png"), Some(" pdf "),
                                          Some(path)),
                   vec![IconSource::ExplicitImagePath("missing.png".into()),
                        IconSource::FileTypeClass("pdf".to_string()),
                        IconSource::FilePath(path.to_path_buf())]);
        assert_eq!(IconSource::candidates(Some(""), None, Some(Path::new(""))),
                   Vec::new());
    }

    #[test]
    fn request_from_candidates() {
        let candidates = IconSource::candidates(Some("missing.png"), Some("pdf"),
                                                None);
        let request = IconRequest::from_candidates(candidates).unwrap();
        assert_eq!(request.source,
                   IconSource::ExplicitImagePath("missing.png".into()));
        assert_eq!(request.fallback_sources,
                   vec![IconSource::FileTypeClass("pdf".to_string())]);
        assert_eq!(IconRequest::from_candidates(Vec::new()), None);
    }

    #[test]
    fn request_defaults() {
        let request = IconRequest::new(IconSource::FileTypeClass("zip".into()));
        assert_eq!(request.target_size, 64.0);
        assert_eq!(request.format(), Some(OutputFormat::Png));
        assert!(!request.strict_mode);
        assert!(request.fallback_sources.is_empty());
        assert_eq!(request.display_name, "UNKNOWN");
    }

    #[test]
    fn extension_of_unknown_alias() {
        let request = IconRequest::new(IconSource::FileTypeClass("zip".into()))
            .with_format(".WebP");
        assert_eq!(request.format(), None);
        assert_eq!(request.extension(), "webp");
    }
}
