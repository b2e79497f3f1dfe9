//! Upload parsing for the Gratuity Tracker.
//!
//! This module turns an uploaded CSV or XLSX file into a [`ParsedBatch`]:
//! a [`RecordSet`] keyed by canonical employee id plus the data-quality
//! issues found along the way.
//!
//! Structural problems (unreadable file, missing required columns) reject
//! the whole upload. Cell-level problems never do: unparseable dates become
//! missing values and are reported as issues.
//!
//! # Example
//!
//! ```
//! use gratuity_tracker::ingest::{parse_upload, UploadFormat};
//!
//! let body = "Emp ID,Name,Department,Joining Date,Exit Date\nE001,John Doe,HR,2015-06-01,\n";
//! let batch = parse_upload(body.as_bytes(), UploadFormat::Csv).unwrap();
//! assert_eq!(batch.records.len(), 1);
//! ```

mod dates;
mod delimited;
mod table;
mod workbook;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TrackerResult;
use crate::models::{DataQualityIssue, RecordSet};

pub use dates::coerce_date;
pub use table::{DEPARTMENT, EMP_ID, EXIT_DATE, JOINING_DATE, NAME, REQUIRED_COLUMNS};

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// The file formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFormat {
    /// Comma-separated text with a header row.
    Csv,
    /// An Excel workbook; the first worksheet is read.
    Xlsx,
}

impl UploadFormat {
    /// Picks a format from the body, the uploaded file's name and its
    /// content type.
    ///
    /// A ZIP signature always means a workbook. Otherwise the file name
    /// extension decides, then a spreadsheet content type selects XLSX, and
    /// anything else is read as CSV.
    ///
    /// # Examples
    ///
    /// ```
    /// use gratuity_tracker::ingest::UploadFormat;
    ///
    /// assert_eq!(UploadFormat::detect(None, Some("text/csv"), b"Emp ID"), UploadFormat::Csv);
    /// assert_eq!(UploadFormat::detect(None, None, b"PK\x03\x04rest"), UploadFormat::Xlsx);
    /// assert_eq!(
    ///     UploadFormat::detect(Some("staff.xlsx"), Some("application/octet-stream"), b"junk"),
    ///     UploadFormat::Xlsx
    /// );
    /// ```
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_SIGNATURE) {
            return UploadFormat::Xlsx;
        }
        if let Some(format) = file_name.and_then(Self::from_file_name) {
            return format;
        }
        match content_type {
            Some(mime) if mime.contains("spreadsheetml") || mime.contains("ms-excel") => {
                UploadFormat::Xlsx
            }
            _ => UploadFormat::Csv,
        }
    }

    /// Maps a file name extension to a format.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "csv" | "txt" => Some(UploadFormat::Csv),
            "xlsx" | "xlsm" | "xls" => Some(UploadFormat::Xlsx),
            _ => None,
        }
    }
}

/// An upload converted into records.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBatch {
    /// The uploaded records, folded by id in upload order.
    pub records: RecordSet,
    /// Data-quality issues found while reading cells.
    pub issues: Vec<DataQualityIssue>,
    /// Number of data rows read (header excluded, blank rows included).
    pub rows_read: usize,
}

/// Parses an uploaded file.
///
/// # Errors
///
/// - [`TrackerError::MalformedUpload`](crate::error::TrackerError::MalformedUpload)
///   if the file cannot be read as a table.
/// - [`TrackerError::MissingColumns`](crate::error::TrackerError::MissingColumns)
///   if any of [`REQUIRED_COLUMNS`] is absent.
pub fn parse_upload(bytes: &[u8], format: UploadFormat) -> TrackerResult<ParsedBatch> {
    let batch = match format {
        UploadFormat::Csv => delimited::read_delimited(bytes)?,
        UploadFormat::Xlsx => workbook::read_workbook(bytes)?,
    };
    debug!(
        format = ?format,
        rows = batch.rows_read,
        records = batch.records.len(),
        issues = batch.issues.len(),
        "Parsed upload"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_zip_signature() {
        assert_eq!(
            UploadFormat::detect(Some("staff.csv"), Some("text/csv"), b"PK\x03\x04...."),
            UploadFormat::Xlsx
        );
    }

    #[test]
    fn test_detect_from_content_type() {
        assert_eq!(
            UploadFormat::detect(
                None,
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
                b"",
            ),
            UploadFormat::Xlsx
        );
        assert_eq!(
            UploadFormat::detect(None, Some("application/octet-stream"), b"Emp ID,Name"),
            UploadFormat::Csv
        );
        assert_eq!(UploadFormat::detect(None, None, b"Emp ID,Name"), UploadFormat::Csv);
    }

    #[test]
    fn test_detect_file_name_beats_content_type() {
        assert_eq!(
            UploadFormat::detect(
                Some("gratuity_format.csv"),
                Some("application/vnd.ms-excel"),
                b"Emp ID,Name",
            ),
            UploadFormat::Csv
        );
        assert_eq!(
            UploadFormat::detect(Some("staff.xlsx"), Some("text/plain"), b"not a zip"),
            UploadFormat::Xlsx
        );
        assert_eq!(
            UploadFormat::detect(Some("notes.pdf"), None, b"Emp ID"),
            UploadFormat::Csv
        );
    }

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(
            UploadFormat::from_file_name("employees.XLSX"),
            Some(UploadFormat::Xlsx)
        );
        assert_eq!(
            UploadFormat::from_file_name("gratuity_format.csv"),
            Some(UploadFormat::Csv)
        );
        assert_eq!(UploadFormat::from_file_name("notes.pdf"), None);
        assert_eq!(UploadFormat::from_file_name("no_extension"), None);
    }

    #[test]
    fn test_parse_upload_dispatches_to_csv() {
        let body = "Emp ID,Name,Department,Joining Date,Exit Date\nE001,,,bad-date,\n";
        let batch = parse_upload(body.as_bytes(), UploadFormat::Csv).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.issues.len(), 1);
    }
}
