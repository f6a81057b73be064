//! Diagram data model shared by import, inference, layout and persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Column data type.
///
/// The five recognized values serialize as `TEXT`, `NUM`, `DATE`, `CHAR` and
/// `BOOL`. Anything else is kept verbatim in `Other` so documents written by
/// older versions load and save without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Text,
    Num,
    Date,
    Char,
    Bool,
    Other(String),
}

impl ColumnType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "TEXT",
            Self::Num => "NUM",
            Self::Date => "DATE",
            Self::Char => "CHAR",
            Self::Bool => "BOOL",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "TEXT" => Self::Text,
            "NUM" => Self::Num,
            "DATE" => Self::Date,
            "CHAR" => Self::Char,
            "BOOL" => Self::Bool,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        match t {
            ColumnType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub typ: ColumnType,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Custom field values keyed by `CustomFieldDefinition::name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>, typ: ColumnType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            typ,
            is_primary_key: false,
            is_foreign_key: false,
            description: None,
            metadata: None,
            collapsed: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    /// Row order on the canvas.
    pub columns: Vec<Column>,
    pub collapsed: bool,
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subtitle: format!("{} columns", columns.len()),
            color: String::new(),
            x: 0.0,
            y: 0.0,
            columns,
            collapsed: false,
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1:1")]
    OneToOne,
    #[serde(rename = "1:N")]
    OneToMany,
    #[serde(rename = "N:M")]
    ManyToMany,
}

/// A directed reference from a key column ("from", the one side) to a
/// referencing column ("to", the many side).
///
/// The four ids are weak references; callers validate them against the
/// current tables before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub from_table_id: String,
    pub from_column_id: String,
    pub to_table_id: String,
    pub to_column_id: String,
    pub cardinality: Cardinality,
    pub inferred: bool,
}

impl Relationship {
    /// Order-independent identity of the link: the four endpoint ids, sorted.
    ///
    /// A relationship and its reverse share the same key.
    pub fn link_key(&self) -> [&str; 4] {
        link_key([
            self.from_table_id.as_str(),
            self.from_column_id.as_str(),
            self.to_table_id.as_str(),
            self.to_column_id.as_str(),
        ])
    }

    pub fn touches_table(&self, table_id: &str) -> bool {
        self.from_table_id == table_id || self.to_table_id == table_id
    }

    pub fn touches_column(&self, table_id: &str, column_id: &str) -> bool {
        (self.from_table_id == table_id && self.from_column_id == column_id)
            || (self.to_table_id == table_id && self.to_column_id == column_id)
    }
}

pub(crate) fn link_key(mut ids: [&str; 4]) -> [&str; 4] {
    ids.sort_unstable();
    ids
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldDefinition {
    pub id: String,
    pub name: String,
}

/// One column as handed over by the file parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedColumn {
    pub name: String,
    pub typ: ColumnType,
}

impl ParsedColumn {
    pub fn new(name: impl Into<String>, typ: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
        }
    }
}

/// One uploaded file (or sheet) reduced to its column list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub file_name: String,
    pub columns: Vec<ParsedColumn>,
}
