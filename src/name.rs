use std::fmt;

use md5::{Digest, Md5};

use crate::request::OutputFormat;

/// The file name of a rendered icon: `<stem>.<extension>`.
///
/// For a successful render the stem is the uppercase hex MD5 digest of the
/// encoded bytes, so the name identifies the content and two renders with
/// identical bytes share one name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct IconName {
    stem: String,
    extension: String,
    placeholder: bool,
}

impl IconName {
    /// Returns the part of the name before the extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Returns the extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns true if this name was made for a failed render and does not
    /// identify any content.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        write!(out, "{}.{}", self.stem, self.extension)
    }
}

/// Derives the content-addressed name of encoded icon bytes.
///
/// # Examples
/// ```
/// use attachment_icon::{name, OutputFormat};
/// let name = name(b"", OutputFormat::Png);
/// assert_eq!(name.to_string(), "D41D8CD98F00B204E9800998ECF8427E.png");
/// ```
pub fn name(bytes: &[u8], format: OutputFormat) -> IconName {
    IconName {
        stem: hex::encode_upper(Md5::digest(bytes)),
        extension: format.extension().to_string(),
        placeholder: false,
    }
}

/// Makes the name reported for a failed non-strict render.
pub fn placeholder(display_name: &str, extension: &str) -> IconName {
    IconName {
        stem: display_name.to_string(),
        extension: extension.to_string(),
        placeholder: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_is_uppercase_md5() {
        let name = name(b"icon bytes", OutputFormat::Jpeg);
        assert_eq!(name.stem().len(), 32);
        assert!(name.stem()
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert_eq!(name.extension(), "jpeg");
        assert!(!name.is_placeholder());
    }

    #[test]
    fn known_digest() {
        // RFC 1321 test vector.
        assert_eq!(name(b"abc", OutputFormat::Gif).to_string(),
                   "900150983CD24FB0D6963F7D28E17F72.gif");
    }

    #[test]
    fn naming_is_deterministic() {
        let bytes = [1u8, 2, 3, 4];
        assert_eq!(name(&bytes, OutputFormat::Png), name(&bytes, OutputFormat::Png));
        assert_ne!(name(&bytes, OutputFormat::Png).stem(),
                   name(&bytes[..3], OutputFormat::Png).stem());
    }

    #[test]
    fn placeholder_uses_display_name() {
        let name = placeholder("report.pdf", "png");
        assert_eq!(name.to_string(), "report.pdf.png");
        assert!(name.is_placeholder());
    }
}
