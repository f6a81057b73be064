//! Spreadsheet (xlsx/xls/ods) parsing, one parsed file per sheet.

use super::delimited::columns_from_rows;
use crate::model::ParsedFile;
use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

/// Parse every sheet of a workbook.
///
/// The first row of a sheet is its header. Sheets without a body row, or
/// yielding no columns, are skipped. Each file is named after its sheet.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<ParsedFile>, calamine::Error> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut files = Vec::new();

    for sheet in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet)?;
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

        let Some(headers) = rows.next() else {
            debug!(sheet = %sheet, "skipping empty sheet");
            continue;
        };
        let body: Vec<Vec<String>> = rows.filter(|row| row.iter().any(|c| !c.is_empty())).collect();
        if body.is_empty() {
            debug!(sheet = %sheet, "skipping sheet without rows");
            continue;
        }

        let columns = columns_from_rows(&headers, &body);
        if columns.is_empty() {
            continue;
        }
        files.push(ParsedFile {
            file_name: sheet,
            columns,
        });
    }

    Ok(files)
}

/// Cell as text. Date cells become `YYYY-MM-DD HH:MM:SS` so they read as dates.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    }
}
