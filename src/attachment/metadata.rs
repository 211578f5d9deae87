use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const SIZE_UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// What the widget shows about an attached file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileMetadata {
    /// Size of the file, in bytes.
    pub len: u64,
    /// Last modification time.
    pub modified: DateTime<Local>,
}

impl FileMetadata {
    /// Reads the metadata of the file at `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> io::Result<FileMetadata> {
        let metadata = fs::metadata(path)?;
        Ok(FileMetadata {
            len: metadata.len(),
            modified: DateTime::from(metadata.modified()?),
        })
    }

    /// Returns the size in binary units, e.g. `1.50 KiB`.
    pub fn pretty_size(&self) -> String {
        pretty_size(self.len)
    }

    /// Returns the modification date as an ISO 8601 date.
    pub fn iso_date(&self) -> String {
        self.modified.date_naive().format("%Y-%m-%d").to_string()
    }
}

/// Formats a byte count in binary units: whole bytes below 1 KiB, two
/// decimals above.
pub fn pretty_size(len: u64) -> String {
    if len < 1024 {
        return format!("{} B", len);
    }
    let mut value = len as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Reads a date written by hand in a tag and returns it as an ISO 8601
/// date.  Accepts a plain date, RFC 3339, and `YYYY-MM-DD HH:MM:SS` with or
/// without a numeric offset.
pub fn iso_date(text: &str) -> Option<String> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z")
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })?;
    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sizes() {
        assert_eq!(pretty_size(0), "0 B");
        assert_eq!(pretty_size(512), "512 B");
        assert_eq!(pretty_size(1536), "1.50 KiB");
        assert_eq!(pretty_size(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn dates() {
        assert_eq!(iso_date("2016-03-01").as_deref(), Some("2016-03-01"));
        assert_eq!(iso_date("2016-03-01 10:11:12 -0800").as_deref(),
                   Some("2016-03-01"));
        assert_eq!(iso_date("2016-03-01T23:00:00+02:00").as_deref(),
                   Some("2016-03-01"));
        assert_eq!(iso_date("yesterday"), None);
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 2048]).unwrap();
        let metadata = FileMetadata::read(file.path()).unwrap();
        assert_eq!(metadata.len, 2048);
        assert_eq!(metadata.pretty_size(), "2.00 KiB");
        assert_eq!(metadata.iso_date().len(), 10);
    }
}
