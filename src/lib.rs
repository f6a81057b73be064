pub mod diagram;
pub mod import;
pub mod infer;
pub mod keys;
pub mod layout;
pub mod measure;
pub mod model;
pub mod typing;

use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use diagram::{Action, Diagram};
use import::{Options, ingest, parse_source};
use infer::RelationshipInferrer;
use model::Table;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Import one CSV, TSV or workbook file into a diagram document.
///
/// `diagram` is the current document as JSON (empty for a new diagram); the
/// result is the updated document. New tables are placed below the existing
/// ones.
#[wasm_bindgen(js_name = "importFile")]
pub fn import_file(diagram: Option<String>, file_name: &str, content: &[u8]) -> Result<String, String> {
    let current = load(diagram.as_deref())?;

    let files = parse_source(file_name, content).map_err(|e| e.to_string())?;
    let ingested = ingest(&files, &current.tables, &Options::default());
    let updated = current.reduce(Action::LoadTables {
        tables: ingested.tables,
        relationships: ingested.relationships,
    });

    updated.to_json().map_err(|e| e.to_string())
}

/// Infer relationships for a JSON map of table id to table.
#[wasm_bindgen(js_name = "inferRelationships")]
pub fn infer_relationships_json(tables: &str, link_unkeyed: Option<bool>) -> Result<String, String> {
    let tables: BTreeMap<String, Table> = serde_json::from_str(tables).map_err(|e| e.to_string())?;
    let relationships = inferrer(link_unkeyed).infer(&tables);
    serde_json::to_string(&relationships).map_err(|e| e.to_string())
}

/// Replace the inferred relationships of a diagram document, keeping manual
/// ones.
#[wasm_bindgen(js_name = "regenerateRelationships")]
pub fn regenerate_relationships(diagram: &str, link_unkeyed: Option<bool>) -> Result<String, String> {
    load(Some(diagram))?
        .regenerate_relationships(&inferrer(link_unkeyed))
        .to_json()
        .map_err(|e| e.to_string())
}

fn load(diagram: Option<&str>) -> Result<Diagram, String> {
    match diagram {
        Some(json) if !json.trim().is_empty() => Diagram::from_json(json).map_err(|e| e.to_string()),
        _ => Ok(Diagram::default()),
    }
}

fn inferrer(link_unkeyed: Option<bool>) -> RelationshipInferrer {
    RelationshipInferrer {
        link_unkeyed_exact_matches: link_unkeyed.unwrap_or(true),
    }
}
