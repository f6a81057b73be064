//! Uploaded files to positioned tables with inferred relationships.

mod delimited;
mod workbook;

pub use delimited::parse_delimited;
pub use workbook::parse_workbook;

use crate::infer::{RelationshipInferrer, mark_foreign_keys};
use crate::keys::detect_primary_key;
use crate::layout::GridLayout;
use crate::model::{Column, ParsedFile, Relationship, Table};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Palette cycled through as tables are created.
pub const TABLE_COLORS: [&str; 10] = [
    "#4dba50", "#5b9bd5", "#c9a84c", "#9b7ec8", "#c87941", "#b85c78", "#6ba3a0", "#8b8bca",
    "#4ca688", "#b0864c",
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed delimited file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed workbook: {0}")]
    Workbook(#[from] calamine::Error),
}

/// Layout and inference settings for an import.
#[derive(Default)]
pub struct Options {
    pub layout: GridLayout,
    pub inference: RelationshipInferrer,
}

/// Tables and relationships produced by one import.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub tables: BTreeMap<String, Table>,
    pub relationships: Vec<Relationship>,
}

/// Parse file contents according to the extension of `file_name`.
///
/// CSV and TSV give one file each, workbooks one per non-empty sheet.
/// Unknown extensions give nothing.
pub fn parse_source(file_name: &str, content: &[u8]) -> Result<Vec<ParsedFile>, ImportError> {
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext.to_lowercase()),
        None => (file_name, String::new()),
    };

    let delimiter = match ext.as_str() {
        "csv" => b',',
        "tsv" => b'\t',
        "xlsx" | "xls" => return parse_workbook(content).map_err(ImportError::from),
        _ => {
            warn!(file = file_name, "skipping file with unrecognized extension");
            return Ok(vec![]);
        }
    };

    let columns = parse_delimited(&String::from_utf8_lossy(content), delimiter)?;
    Ok(vec![ParsedFile {
        file_name: stem.to_string(),
        columns,
    }])
}

pub fn parse_file(path: &Path) -> Result<Vec<ParsedFile>, ImportError> {
    let content = fs::read(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_source(&file_name, &content)
}

/// Build tables from parsed files.
///
/// `existing_count` is the number of tables already on the canvas; it offsets
/// the palette and the provisional grid slot.
pub fn files_to_tables(files: &[ParsedFile], existing_count: usize, grid: &GridLayout) -> Vec<Table> {
    files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let idx = existing_count + i;
            let keys = detect_primary_key(&file.columns);
            let (x, y) = grid.cell(idx);

            let columns = file
                .columns
                .iter()
                .map(|c| {
                    let mut col = Column::new(Uuid::new_v4().to_string(), c.name.clone(), c.typ.clone());
                    col.is_primary_key = keys.contains(&c.name);
                    col
                })
                .collect();

            Table {
                color: TABLE_COLORS[idx % TABLE_COLORS.len()].to_string(),
                x,
                y,
                ..Table::new(Uuid::new_v4().to_string(), file.file_name.clone(), columns)
            }
        })
        .collect()
}

/// Turn parsed files into laid-out tables with inferred, FK-marked
/// relationships.
///
/// New tables are packed below the `existing` ones and only linked among
/// themselves.
pub fn ingest(files: &[ParsedFile], existing: &BTreeMap<String, Table>, options: &Options) -> Ingested {
    let tables = files_to_tables(files, existing.len(), &options.layout);
    let tables: BTreeMap<String, Table> = options
        .layout
        .layout_below(existing.values(), &tables)
        .into_iter()
        .map(|t| (t.id.clone(), t))
        .collect();

    let relationships = options.inference.infer(&tables);
    let tables = mark_foreign_keys(&tables, &relationships);

    info!(
        tables = tables.len(),
        relationships = relationships.len(),
        "ingested files"
    );
    Ingested {
        tables,
        relationships,
    }
}
