//! CSV/TSV header parsing.
//!
//! A file or sheet is either a schema definition (one row per column, with a
//! name and a type header) or raw data (headers are the column names and the
//! rows are samples for type inference).

use crate::model::{ColumnType, ParsedColumn};
use crate::typing::infer_type;
use regex::Regex;
use std::sync::LazyLock;

static NAME_HEADERS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)^name$").unwrap(),
        Regex::new(r"(?i)^column$").unwrap(),
        Regex::new(r"(?i)^column.?name$").unwrap(),
        Regex::new(r"(?i)^field$").unwrap(),
        Regex::new(r"(?i)^field.?name$").unwrap(),
    ]
});

static TYPE_HEADERS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)^type$").unwrap(),
        Regex::new(r"(?i)^data.?type$").unwrap(),
        Regex::new(r"(?i)^column.?type$").unwrap(),
        Regex::new(r"(?i)^field.?type$").unwrap(),
        Regex::new(r"(?i)^dtype$").unwrap(),
    ]
});

fn find_header(headers: &[String], patterns: &[Regex]) -> Option<usize> {
    headers
        .iter()
        .position(|h| patterns.iter().any(|p| p.is_match(h.trim())))
}

/// Parse delimited text into a column list.
pub fn parse_delimited(text: &str, delimiter: u8) -> Result<Vec<ParsedColumn>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(vec![]);
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        rows.push(row);
    }

    Ok(columns_from_rows(&headers, &rows))
}

/// Columns from a header row and body rows of the same width.
pub(super) fn columns_from_rows(headers: &[String], rows: &[Vec<String>]) -> Vec<ParsedColumn> {
    let name_col = find_header(headers, NAME_HEADERS.as_slice());
    let type_col = find_header(headers, TYPE_HEADERS.as_slice());

    match (name_col, type_col) {
        (Some(name_col), Some(type_col)) => schema_columns(rows, name_col, type_col),
        _ => data_columns(headers, rows),
    }
}

fn schema_columns(rows: &[Vec<String>], name_col: usize, type_col: usize) -> Vec<ParsedColumn> {
    rows.iter()
        .map(|row| {
            let name = row[name_col].trim().to_string();
            let typ = match row[type_col].trim() {
                "" => ColumnType::Text,
                t => ColumnType::from(t.to_uppercase()),
            };
            ParsedColumn { name, typ }
        })
        .filter(|c| !c.name.is_empty())
        .collect()
}

fn data_columns(headers: &[String], rows: &[Vec<String>]) -> Vec<ParsedColumn> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<&str> = rows.iter().map(|row| row[i].as_str()).collect();
            ParsedColumn {
                name: name.clone(),
                typ: infer_type(&values),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_data_infers_types() {
        let text = "id,name,created\n1,alice,2024-01-01\n2,bob,2024-02-01\n";
        let cols = parse_delimited(text, b',').unwrap();

        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0], ParsedColumn::new("id", ColumnType::Num));
        assert_eq!(cols[1], ParsedColumn::new("name", ColumnType::Text));
        assert_eq!(cols[2], ParsedColumn::new("created", ColumnType::Date));
    }

    #[test]
    fn test_schema_definition() {
        let text = "Column Name,Data Type,Notes\n id , num ,key\nlabel,,\n,TEXT,blank name\nflag,bool,\n";
        let cols = parse_delimited(text, b',').unwrap();

        assert_eq!(
            cols,
            vec![
                ParsedColumn::new("id", ColumnType::Num),
                ParsedColumn::new("label", ColumnType::Text),
                ParsedColumn::new("flag", ColumnType::Bool),
            ]
        );
    }

    #[test]
    fn test_name_header_alone_is_data() {
        let text = "name,age\nalice,30\n";
        let cols = parse_delimited(text, b',').unwrap();
        assert_eq!(cols[0], ParsedColumn::new("name", ColumnType::Text));
        assert_eq!(cols[1], ParsedColumn::new("age", ColumnType::Num));
    }

    #[test]
    fn test_short_rows_and_blank_lines() {
        let text = "a\tb\n1\n\n2\t3\n";
        let cols = parse_delimited(text, b'\t').unwrap();
        assert_eq!(cols[0].typ, ColumnType::Num);
        assert_eq!(cols[1].typ, ColumnType::Num);
    }

    #[test]
    fn test_headers_only() {
        let cols = parse_delimited("x,y\n", b',').unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].typ, ColumnType::Text);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_delimited("", b',').unwrap().is_empty());
    }

    #[test]
    fn test_unknown_schema_type_kept() {
        let text = "field,type\nsku,varchar\n";
        let cols = parse_delimited(text, b',').unwrap();
        assert_eq!(cols[0].typ, ColumnType::Other("VARCHAR".into()));
    }
}
