//! Column mapping and row-to-record conversion shared by every upload format.

use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{DataQualityIssue, EmployeeId, EmployeeRecord, RecordSet};

use super::ParsedBatch;
use super::dates::coerce_date;

/// Header of the employee id column.
pub const EMP_ID: &str = "Emp ID";
/// Header of the name column.
pub const NAME: &str = "Name";
/// Header of the department column.
pub const DEPARTMENT: &str = "Department";
/// Header of the joining date column.
pub const JOINING_DATE: &str = "Joining Date";
/// Header of the exit date column.
pub const EXIT_DATE: &str = "Exit Date";

/// Columns every upload must carry, in template order.
pub const REQUIRED_COLUMNS: [&str; 5] = [EMP_ID, NAME, DEPARTMENT, JOINING_DATE, EXIT_DATE];

static EMPTY_CELL: Cell = Cell::Empty;

/// A single cell as read from a CSV field or a worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Wraps trimmed text; blank text becomes [`Cell::Empty`].
    pub(crate) fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(text) => Some(text.clone()),
            Cell::Date(date) => Some(date.to_string()),
        }
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_lowercase()
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    id: usize,
    name: usize,
    department: usize,
    joining_date: usize,
    exit_date: usize,
}

impl ColumnMap {
    /// Locates the required columns, matching headers trimmed and case-insensitively.
    ///
    /// Extra columns are ignored. Fails with [`TrackerError::MissingColumns`]
    /// naming every absent column.
    pub(crate) fn from_headers<S: AsRef<str>>(headers: &[S]) -> TrackerResult<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|header| normalize_header(header.as_ref()))
            .collect();

        let mut positions = [0usize; 5];
        let mut missing = Vec::new();
        for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
            let wanted = column.to_ascii_lowercase();
            match normalized.iter().position(|header| *header == wanted) {
                Some(position) => positions[slot] = position,
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(TrackerError::MissingColumns { columns: missing });
        }

        let [id, name, department, joining_date, exit_date] = positions;
        Ok(Self {
            id,
            name,
            department,
            joining_date,
            exit_date,
        })
    }
}

/// Accumulates rows into a [`ParsedBatch`].
#[derive(Debug, Default)]
pub(crate) struct BatchBuilder {
    records: RecordSet,
    issues: Vec<DataQualityIssue>,
    rows_read: usize,
}

impl BatchBuilder {
    /// Converts one data row and folds it into the batch.
    ///
    /// Fully blank rows are skipped silently; rows without an id are skipped
    /// with a [`DataQualityIssue::MissingId`].
    pub(crate) fn push_row(&mut self, columns: &ColumnMap, cells: &[Cell]) {
        self.rows_read += 1;
        let row = self.rows_read;
        let cell = |position: usize| cells.get(position).unwrap_or(&EMPTY_CELL);

        let mapped = [
            cell(columns.id),
            cell(columns.name),
            cell(columns.department),
            cell(columns.joining_date),
            cell(columns.exit_date),
        ];
        if mapped.iter().all(|c| c.is_empty()) {
            return;
        }

        let Some(id) = cell(columns.id)
            .as_text()
            .and_then(|raw| EmployeeId::parse(&raw))
        else {
            self.issues.push(DataQualityIssue::MissingId { row });
            return;
        };

        let joining_date = self.read_date(&id, JOINING_DATE, cell(columns.joining_date));
        let exit_date = self.read_date(&id, EXIT_DATE, cell(columns.exit_date));
        let record = EmployeeRecord {
            id: id.clone(),
            name: cell(columns.name).as_text(),
            department: cell(columns.department).as_text(),
            joining_date,
            exit_date,
        };

        if self.records.contains(&id) {
            self.issues.push(DataQualityIssue::DuplicateId { id, row });
        }
        self.records.upsert(record);
    }

    fn read_date(&mut self, id: &EmployeeId, column: &str, cell: &Cell) -> Option<NaiveDate> {
        match cell {
            Cell::Empty => None,
            Cell::Date(date) => Some(*date),
            Cell::Text(text) => {
                let parsed = coerce_date(text);
                if parsed.is_none() {
                    self.issues.push(DataQualityIssue::UnparseableDate {
                        id: id.clone(),
                        column: column.to_string(),
                        value: text.clone(),
                    });
                }
                parsed
            }
        }
    }

    pub(crate) fn finish(self) -> ParsedBatch {
        ParsedBatch {
            records: self.records,
            issues: self.issues,
            rows_read: self.rows_read,
        }
    }
}
