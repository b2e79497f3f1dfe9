//! Delimited text (CSV) uploads.

use crate::error::{TrackerError, TrackerResult};

use super::ParsedBatch;
use super::table::{BatchBuilder, Cell, ColumnMap};

fn malformed(message: impl Into<String>) -> TrackerError {
    TrackerError::MalformedUpload {
        message: message.into(),
    }
}

/// Reads a comma-separated upload whose first row is the header.
///
/// Rows may be shorter than the header; missing trailing cells read as empty.
pub(crate) fn read_delimited(bytes: &[u8]) -> TrackerResult<ParsedBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| malformed(format!("could not read header row: {e}")))?
        .clone();
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(malformed("file has no header row"));
    }

    let header_names: Vec<&str> = headers.iter().collect();
    let columns = ColumnMap::from_headers(&header_names)?;

    let mut builder = BatchBuilder::default();
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| malformed(format!("data row {}: {e}", index + 1)))?;
        let cells: Vec<Cell> = row.iter().map(Cell::text).collect();
        builder.push_row(&columns, &cells);
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_reads_template_shaped_file() {
        let body = "Emp ID,Name,Department,Joining Date,Exit Date\n\
                    E001,John Doe,HR,2015-06-01,\n\
                    E002,Jane Smith,Finance,2018-09-15,2024-03-31\n";
        let batch = read_delimited(body.as_bytes()).unwrap();

        assert_eq!(batch.rows_read, 2);
        assert_eq!(batch.records.len(), 2);
        assert!(batch.issues.is_empty());
        let jane = &batch.records.records()[1];
        assert_eq!(jane.department.as_deref(), Some("Finance"));
        assert_eq!(jane.exit_date, NaiveDate::from_ymd_opt(2024, 3, 31));
    }

    #[test]
    fn test_quoted_fields_and_short_rows() {
        let body = "Emp ID,Name,Department,Joining Date,Exit Date\n\
                    1001,\"Doe, John\",HR\n";
        let batch = read_delimited(body.as_bytes()).unwrap();
        let record = &batch.records.records()[0];
        assert_eq!(record.name.as_deref(), Some("Doe, John"));
        assert_eq!(record.joining_date, None);
    }

    #[test]
    fn test_missing_column_rejects_whole_file() {
        let body = "Emp ID,Name,Department,Joining Date\nE001,John,HR,2015-06-01\n";
        match read_delimited(body.as_bytes()) {
            Err(TrackerError::MissingColumns { columns }) => {
                assert_eq!(columns, vec!["Exit Date"]);
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_malformed() {
        assert!(matches!(
            read_delimited(b""),
            Err(TrackerError::MalformedUpload { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut body = b"Emp ID,Name,Department,Joining Date,Exit Date\nE001,".to_vec();
        body.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        body.extend_from_slice(b",HR,2015-06-01,\n");
        assert!(matches!(
            read_delimited(&body),
            Err(TrackerError::MalformedUpload { .. })
        ));
    }
}
