//! Spreadsheet (XLSX) uploads.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};

use crate::error::{TrackerError, TrackerResult};

use super::ParsedBatch;
use super::table::{BatchBuilder, Cell, ColumnMap};

fn malformed(message: impl Into<String>) -> TrackerError {
    TrackerError::MalformedUpload {
        message: message.into(),
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(text) => Cell::text(text),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_date() {
            Some(date) => Cell::Date(date),
            None => Cell::text(&data.to_string()),
        },
        other => Cell::text(&other.to_string()),
    }
}

/// Reads the first worksheet of a workbook; its first row is the header.
pub(crate) fn read_workbook(bytes: &[u8]) -> TrackerResult<ParsedBatch> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| malformed(format!("could not open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| malformed("workbook has no worksheets"))?
        .map_err(|e| malformed(format!("could not read worksheet: {e}")))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| malformed("worksheet is empty"))?;
    let header_names: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();
    let columns = ColumnMap::from_headers(&header_names)?;

    let mut builder = BatchBuilder::default();
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(cell_from_data).collect();
        builder.push_row(&columns, &cells);
    }

    Ok(builder.finish())
}
