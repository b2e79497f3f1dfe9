//! CSV export of records and evaluation results.
//!
//! The export keeps the upload column layout and appends the derived
//! columns, so an exported report can be uploaded again unchanged (the
//! derived columns are ignored on the way back in).

mod template;

use std::io::Write;

use rust_decimal::Decimal;

use crate::error::{TrackerError, TrackerResult};
use crate::ingest::REQUIRED_COLUMNS;
use crate::models::{EmployeeRecord, EvaluatedRecord};

pub use template::{sample_records, template_csv};

/// Header of the tenure column.
pub const COMPLETED_YEARS: &str = "Completed Years";
/// Header of the status column.
pub const STATUS: &str = "Status";
/// Header of the eligibility column.
pub const GRATUITY_ELIGIBLE: &str = "Gratuity Eligible";

/// Columns of an evaluated export, in order.
pub const REPORT_COLUMNS: [&str; 8] = [
    REQUIRED_COLUMNS[0],
    REQUIRED_COLUMNS[1],
    REQUIRED_COLUMNS[2],
    REQUIRED_COLUMNS[3],
    REQUIRED_COLUMNS[4],
    COMPLETED_YEARS,
    STATUS,
    GRATUITY_ELIGIBLE,
];

fn export_error(error: impl std::fmt::Display) -> TrackerError {
    TrackerError::Export {
        message: error.to_string(),
    }
}

fn base_fields(record: &EmployeeRecord) -> [String; 5] {
    [
        record.id.to_string(),
        record.name.clone().unwrap_or_default(),
        record.department.clone().unwrap_or_default(),
        record
            .joining_date
            .map(|date| date.to_string())
            .unwrap_or_default(),
        record
            .exit_date
            .map(|date| date.to_string())
            .unwrap_or_default(),
    ]
}

fn format_years(years: Decimal) -> String {
    format!("{:.2}", years)
}

fn finish<W: Write>(writer: csv::Writer<W>) -> TrackerResult<W> {
    writer.into_inner().map_err(|e| export_error(e.error()))
}

/// Writes records in the upload layout (no derived columns).
pub fn write_records_csv<'a, I>(records: I) -> TrackerResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REQUIRED_COLUMNS).map_err(export_error)?;
    for record in records {
        writer
            .write_record(base_fields(record))
            .map_err(export_error)?;
    }
    finish(writer)
}

/// Writes evaluated rows with the derived columns appended.
///
/// Rows without derived fields get blank derived cells. Eligibility is
/// written as `True` / `False`.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::calculation::{evaluate, DEFAULT_GRATUITY_THRESHOLD};
/// use gratuity_tracker::export::{sample_records, write_report_csv};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let report = evaluate(&sample_records(), today, DEFAULT_GRATUITY_THRESHOLD);
/// let csv = String::from_utf8(write_report_csv(&report.rows).unwrap()).unwrap();
///
/// assert!(csv.starts_with("Emp ID,Name,Department,Joining Date,Exit Date,Completed Years,Status,Gratuity Eligible"));
/// assert!(csv.contains("E001,John Doe,HR,2015-06-01,,9.01,Working,True"));
/// ```
pub fn write_report_csv(rows: &[EvaluatedRecord]) -> TrackerResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS).map_err(export_error)?;

    for row in rows {
        let [id, name, department, joining, exit] = base_fields(&row.record);
        let (years, status, eligible) = match row.derived {
            Some(derived) => (
                format_years(derived.completed_years),
                derived.status.to_string(),
                if derived.gratuity_eligible {
                    "True".to_string()
                } else {
                    "False".to_string()
                },
            ),
            None => (String::new(), String::new(), String::new()),
        };
        writer
            .write_record([
                id, name, department, joining, exit, years, status, eligible,
            ])
            .map_err(export_error)?;
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DerivedFields, EmployeeId, EmploymentStatus};
    use chrono::NaiveDate;

    fn row(derived: Option<DerivedFields>) -> EvaluatedRecord {
        EvaluatedRecord {
            record: EmployeeRecord {
                id: EmployeeId::parse("E010").unwrap(),
                name: Some("Doe, Jane".to_string()),
                department: Some("Finance".to_string()),
                joining_date: NaiveDate::from_ymd_opt(2010, 1, 1),
                exit_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            },
            derived,
        }
    }

    fn lines(bytes: Vec<u8>) -> Vec<String> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_report_row_with_derived_fields() {
        let bytes = write_report_csv(&[row(Some(DerivedFields {
            completed_years: Decimal::new(10, 0),
            status: EmploymentStatus::Exited,
            gratuity_eligible: true,
        }))])
        .unwrap();

        let lines = lines(bytes);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "E010,\"Doe, Jane\",Finance,2010-01-01,2020-01-01,10.00,Exited,True"
        );
    }

    #[test]
    fn test_report_row_without_derived_fields() {
        let mut unevaluated = row(None);
        unevaluated.record.joining_date = None;
        let lines = lines(write_report_csv(&[unevaluated]).unwrap());
        assert_eq!(lines[1], "E010,\"Doe, Jane\",Finance,,2020-01-01,,,");
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let lines = lines(write_report_csv(&[]).unwrap());
        assert_eq!(lines, vec![REPORT_COLUMNS.join(",")]);
    }

    #[test]
    fn test_records_csv_uses_upload_layout() {
        let record = row(None).record;
        let lines = lines(write_records_csv([&record]).unwrap());
        assert_eq!(lines[0], "Emp ID,Name,Department,Joining Date,Exit Date");
        assert_eq!(lines[1], "E010,\"Doe, Jane\",Finance,2010-01-01,2020-01-01");
    }
}
