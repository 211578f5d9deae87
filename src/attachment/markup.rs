use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::AttachmentError;
use crate::request::{IconRequest, IconSource, DEFAULT_FORMAT_ALIAS, DEFAULT_ICON_SIZE};

static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_-]+):\s").unwrap()
});

/// The settings written in an attachment tag, e.g.
/// `files/report.pdf name: Q3 report icon_size: 32 whiny: true`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagConfig {
    file_path: String,
    values: HashMap<String, String>,
}

impl TagConfig {
    /// Parses tag markup.  The text before the first `key: ` is the file
    /// path; each `key: ` starts a value that runs up to the next key.  A
    /// key is letters, `_` and `-`, followed by a colon and whitespace, so
    /// URLs in values are not split.  Later keys replace earlier ones.
    pub fn parse(markup: &str) -> TagConfig {
        let mut file_path = markup.trim().to_string();
        let mut values = HashMap::new();
        let mut current: Option<String> = None;
        let mut value_start = 0;
        for captures in KEY_PATTERN.captures_iter(markup) {
            let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let text = markup[value_start..whole.start()].trim().to_string();
            match current.take() {
                None => file_path = text,
                Some(key) => {
                    values.insert(key, text);
                }
            }
            current = Some(key.as_str().to_string());
            value_start = whole.end();
        }
        if let Some(key) = current {
            values.insert(key, markup[value_start..].trim().to_string());
        }
        TagConfig { file_path, values }
    }

    /// Returns the path of the attached file, relative to the site source.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Returns the value of an arbitrary key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The display name of the attachment.
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    /// A preformatted file size that overrides the real one.
    pub fn size(&self) -> Option<&str> {
        self.get("size")
    }

    /// A modification date that overrides the file's own.
    pub fn modified_date(&self) -> Option<&str> {
        self.get("modified_date")
    }

    /// The icon size, unparsed.
    pub fn icon_size(&self) -> Option<&str> {
        self.get("icon_size")
    }

    /// The icon format alias.
    pub fn icon_format(&self) -> Option<&str> {
        self.get("icon_format")
    }

    /// Returns true if icon failures should abort the build.
    pub fn whiny(&self) -> bool {
        match self.get("whiny") {
            Some(value) => {
                matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "1")
            }
            None => false,
        }
    }

    /// An image file to use as the icon.
    pub fn image_path(&self) -> Option<&str> {
        self.get("image_path")
    }

    /// A file type whose generic icon to use.
    pub fn file_type(&self) -> Option<&str> {
        self.get("file_type")
    }

    /// Returns the display name: the `name` value, else the file name of
    /// the attachment.
    pub fn display_name(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => Path::new(&self.file_path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.file_path.clone()),
        }
    }

    /// Builds the icon request for this tag, given where the attachment
    /// actually lives on disk.  The image path, file type, and file are
    /// tried in that order until one resolves.
    pub fn icon_request(&self, full_path: &Path) -> Result<IconRequest, AttachmentError> {
        let target_size = match self.icon_size() {
            Some(value) => value.parse::<f64>().map_err(|_| {
                AttachmentError::InvalidValue { key: "icon_size", value: value.to_string() }
            })?,
            None => DEFAULT_ICON_SIZE,
        };
        let candidates =
            IconSource::candidates(self.image_path(), self.file_type(), Some(full_path));
        let request = IconRequest::from_candidates(candidates)
            .ok_or_else(|| AttachmentError::InvalidValue {
                key: "file_path",
                value: self.file_path.clone(),
            })?;
        Ok(request
            .with_size(target_size)
            .with_format(self.icon_format().unwrap_or(DEFAULT_FORMAT_ALIAS))
            .with_strict_mode(self.whiny())
            .with_display_name(&self.display_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn path_only() {
        let config = TagConfig::parse("  files/report.pdf ");
        assert_eq!(config.file_path(), "files/report.pdf");
        assert_eq!(config.name(), None);
        assert_eq!(config.display_name(), "report.pdf");
    }

    #[test]
    fn keys_split_values() {
        let config = TagConfig::parse(
            "files/a b.zip name: The A B archive icon_size: 32 \
             image_path: http://example.com/x.png whiny: yes");
        assert_eq!(config.file_path(), "files/a b.zip");
        assert_eq!(config.name(), Some("The A B archive"));
        assert_eq!(config.icon_size(), Some("32"));
        assert_eq!(config.image_path(), Some("http://example.com/x.png"));
        assert!(config.whiny());
    }

    #[test]
    fn later_keys_win() {
        let config = TagConfig::parse("x.txt name: one name: two");
        assert_eq!(config.name(), Some("two"));
    }

    #[test]
    fn request_defaults() {
        let config = TagConfig::parse("docs/x.txt");
        let request = config.icon_request(Path::new("/site/docs/x.txt")).unwrap();
        assert_eq!(request.target_size, 64.0);
        assert_eq!(request.output_format, "png");
        assert!(!request.strict_mode);
        assert_eq!(request.display_name, "x.txt");
        assert_eq!(request.source,
                   IconSource::FilePath(PathBuf::from("/site/docs/x.txt")));
    }

    #[test]
    fn request_from_settings() {
        let config = TagConfig::parse(
            "docs/x.txt file_type: pdf icon_size: 128 icon_format: jpg whiny: true");
        let request = config.icon_request(Path::new("/site/docs/x.txt")).unwrap();
        assert_eq!(request.source, IconSource::FileTypeClass("pdf".to_string()));
        assert_eq!(request.fallback_sources,
                   vec![IconSource::FilePath(PathBuf::from("/site/docs/x.txt"))]);
        assert_eq!(request.target_size, 128.0);
        assert_eq!(request.extension(), "jpeg");
        assert!(request.strict_mode);
    }

    #[test]
    fn bad_icon_size() {
        let config = TagConfig::parse("x.txt icon_size: big");
        let err = config.icon_request(Path::new("x.txt")).unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidValue { key: "icon_size", .. }));
    }
}
