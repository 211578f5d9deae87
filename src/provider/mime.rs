use std::path::Path;

/// Returns the MIME type for a file extension (without the dot, any case),
/// if it is a known one.
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.trim().trim_start_matches('.');
    mime_guess::from_ext(extension).first_raw()
}

/// Returns the usual extension for a MIME type, if it is a known one.
pub fn extension_for_mime_type(mime: &str) -> Option<&'static str> {
    mime_guess::get_mime_extensions_str(mime.trim())?.first().copied()
}

/// Returns the lowercase extension of a path, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Normalizes a file type argument to a MIME type: MIME types pass through
/// (lowercased), extensions are looked up.
pub(crate) fn mime_type_for_file_type(file_type: &str) -> Option<String> {
    let file_type = file_type.trim();
    if file_type.contains('/') {
        Some(file_type.to_ascii_lowercase())
    } else {
        mime_type_for_extension(file_type).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_dot() {
        assert_eq!(mime_type_for_extension("PDF"), Some("application/pdf"));
        assert_eq!(mime_type_for_extension(".zip"), Some("application/zip"));
        assert_eq!(mime_type_for_extension("nope"), None);
        assert_eq!(mime_type_for_extension(""), None);
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(extension_for_mime_type("application/pdf"), Some("pdf"));
        assert_eq!(extension_for_mime_type("application/x-no-such-type"), None);
    }

    #[test]
    fn file_type_normalization() {
        assert_eq!(mime_type_for_file_type("Text/Plain").as_deref(),
                   Some("text/plain"));
        assert_eq!(mime_type_for_file_type("mp3").as_deref(),
                   Some("audio/mpeg"));
        assert_eq!(mime_type_for_file_type("folder"), None);
    }

    #[test]
    fn extension_of_paths() {
        assert_eq!(extension_of(Path::new("a/b/Report.PDF")).as_deref(),
                   Some("pdf"));
        assert_eq!(extension_of(Path::new("Makefile")), None);
    }
}
