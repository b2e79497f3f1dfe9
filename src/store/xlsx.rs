//! Spreadsheet-file record store.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use tracing::{debug, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::ingest::{REQUIRED_COLUMNS, UploadFormat, parse_upload};
use crate::models::RecordSet;

use super::RecordStore;

const SHEET_NAME: &str = "Employees";
const DATE_FORMAT: &str = "yyyy-mm-dd";

/// A [`RecordStore`] backed by a single XLSX file.
///
/// Only the upload columns are written; derived fields are recomputed
/// whenever the set is evaluated. Saves write a sibling temporary file and
/// rename it over the target, so a failed save leaves the previous file.
///
/// # Example
///
/// ```no_run
/// use gratuity_tracker::store::{RecordStore, XlsxRecordStore};
///
/// let store = XlsxRecordStore::new("./data/employees.xlsx");
/// let records = store.load()?.unwrap_or_default();
/// store.save(&records)?;
/// # Ok::<(), gratuity_tracker::error::TrackerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct XlsxRecordStore {
    path: PathBuf,
}

impl XlsxRecordStore {
    /// Creates a store for the given file path. The file need not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn error(&self, error: impl Display) -> TrackerError {
        TrackerError::Storage {
            path: self.path.display().to_string(),
            message: error.to_string(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn build_workbook(records: &RecordSet) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format(DATE_FORMAT);

        for (col, header) in REQUIRED_COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (index, record) in records.iter().enumerate() {
            let row = (index + 1) as u32;
            worksheet.write_string(row, 0, record.id.as_str())?;
            if let Some(name) = &record.name {
                worksheet.write_string(row, 1, name)?;
            }
            if let Some(department) = &record.department {
                worksheet.write_string(row, 2, department)?;
            }
            if let Some(date) = record.joining_date {
                write_date(worksheet, row, 3, date, &date_format)?;
            }
            if let Some(date) = record.exit_date {
                write_date(worksheet, row, 4, date, &date_format)?;
            }
        }

        worksheet.set_column_width(0, 12)?;
        worksheet.set_column_width(1, 24)?;
        worksheet.set_column_width(2, 16)?;
        worksheet.set_column_width(3, 14)?;
        worksheet.set_column_width(4, 14)?;

        Ok(workbook)
    }
}

/// Writes a date cell, falling back to ISO text outside Excel's date range.
fn write_date(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    date: NaiveDate,
    format: &Format,
) -> Result<(), XlsxError> {
    let excel_date = u16::try_from(date.year())
        .ok()
        .and_then(|year| ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok());

    match excel_date {
        Some(excel_date) => {
            worksheet.write_datetime_with_format(row, col, &excel_date, format)?;
        }
        None => {
            worksheet.write_string(row, col, date.to_string())?;
        }
    }
    Ok(())
}

impl RecordStore for XlsxRecordStore {
    fn load(&self) -> TrackerResult<Option<RecordSet>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No stored records yet");
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(|e| self.error(e))?;
        let batch = parse_upload(&bytes, UploadFormat::Xlsx).map_err(|e| self.error(e))?;
        for issue in &batch.issues {
            warn!(path = %self.path.display(), issue = %issue, "Stored record has a data-quality issue");
        }

        debug!(path = %self.path.display(), records = batch.records.len(), "Loaded stored records");
        Ok(Some(batch.records))
    }

    fn save(&self, records: &RecordSet) -> TrackerResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }

        let mut workbook = Self::build_workbook(records).map_err(|e| self.error(e))?;
        let temp_path = self.temp_path();
        workbook.save(&temp_path).map_err(|e| self.error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.error(e))?;

        debug!(path = %self.path.display(), records = records.len(), "Saved records");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
