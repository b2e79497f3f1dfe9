//! The downloadable upload template.

use chrono::NaiveDate;

use crate::error::TrackerResult;
use crate::models::{EmployeeId, EmployeeRecord, RecordSet};

use super::write_records_csv;

fn sample(id: &str, name: &str, department: &str, joined: (i32, u32, u32)) -> Option<EmployeeRecord> {
    Some(EmployeeRecord {
        id: EmployeeId::parse(id)?,
        name: Some(name.to_string()),
        department: Some(department.to_string()),
        joining_date: NaiveDate::from_ymd_opt(joined.0, joined.1, joined.2),
        exit_date: None,
    })
}

/// The two example rows shipped in the upload template.
pub fn sample_records() -> RecordSet {
    [
        sample("E001", "John Doe", "HR", (2015, 6, 1)),
        sample("E002", "Jane Smith", "Finance", (2018, 9, 15)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// The upload template as CSV: required headers plus example rows.
pub fn template_csv() -> TrackerResult<Vec<u8>> {
    write_records_csv(&sample_records())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_contents() {
        let text = String::from_utf8(template_csv().unwrap()).unwrap();
        assert_eq!(
            text,
            "Emp ID,Name,Department,Joining Date,Exit Date\n\
             E001,John Doe,HR,2015-06-01,\n\
             E002,Jane Smith,Finance,2018-09-15,\n"
        );
    }

    #[test]
    fn test_template_parses_back() {
        let bytes = template_csv().unwrap();
        let batch = crate::ingest::parse_upload(&bytes, crate::ingest::UploadFormat::Csv).unwrap();
        assert_eq!(batch.records, sample_records());
        assert!(batch.issues.is_empty());
    }
}
