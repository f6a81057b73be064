//! Editable diagram state and its persisted document form.

use crate::infer::{RelationshipInferrer, mark_foreign_keys};
use crate::model::{
    Cardinality, Column, ColumnType, CustomFieldDefinition, Relationship, Table,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("Invalid diagram document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tables, relationships and custom field definitions of one diagram.
///
/// This is also the persisted document shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub tables: BTreeMap<String, Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub custom_field_definitions: Vec<CustomFieldDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableUpdate {
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnUpdate {
    pub name: Option<String>,
    pub typ: Option<ColumnType>,
    pub is_primary_key: Option<bool>,
    pub is_foreign_key: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipUpdate {
    pub from_table_id: Option<String>,
    pub from_column_id: Option<String>,
    pub to_table_id: Option<String>,
    pub to_column_id: Option<String>,
    pub cardinality: Option<Cardinality>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Merge freshly imported tables and their relationships.
    LoadTables {
        tables: BTreeMap<String, Table>,
        relationships: Vec<Relationship>,
    },
    /// Replace all inferred relationships, keeping manual ones.
    GenerateRelationships {
        tables: BTreeMap<String, Table>,
        relationships: Vec<Relationship>,
    },
    MoveTable { table_id: String, x: f64, y: f64 },
    UpdateTable { table_id: String, update: TableUpdate },
    UpdateColumn { table_id: String, column_id: String, update: ColumnUpdate },
    AddColumn { table_id: String, column: Column },
    DeleteColumn { table_id: String, column_id: String },
    AddTable(Table),
    DeleteTable { table_id: String },
    AddRelationship(Relationship),
    UpdateRelationship { relationship_id: String, update: RelationshipUpdate },
    DeleteRelationship { relationship_id: String },
    ToggleCollapse { table_id: String },
    ToggleColumnCollapse { table_id: String, column_id: String },
    UpdateColumnMetadata {
        table_id: String,
        column_id: String,
        description: Option<String>,
        metadata: Option<BTreeMap<String, String>>,
    },
    AddCustomField(CustomFieldDefinition),
    RenameCustomField { field_id: String, new_name: String },
    DeleteCustomField { field_id: String },
    Reset,
}

impl Diagram {
    /// Apply one action, consuming the previous state.
    ///
    /// Actions naming a table, column or relationship that does not exist
    /// leave the diagram unchanged.
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::LoadTables {
                tables,
                relationships,
            } => {
                info!(
                    tables = tables.len(),
                    relationships = relationships.len(),
                    "loading tables"
                );
                self.tables.extend(tables);
                self.relationships.extend(relationships);
            }

            Action::GenerateRelationships {
                tables,
                relationships,
            } => {
                self.tables.extend(tables);
                self.relationships.retain(|r| !r.inferred);

                let manual: HashSet<[String; 4]> = self
                    .relationships
                    .iter()
                    .map(|r| r.link_key().map(str::to_string))
                    .collect();
                let fresh: Vec<Relationship> = relationships
                    .into_iter()
                    .filter(|r| !manual.contains(&r.link_key().map(str::to_string)))
                    .collect();

                info!(
                    kept = self.relationships.len(),
                    inferred = fresh.len(),
                    "regenerated relationships"
                );
                self.relationships.extend(fresh);
            }

            Action::MoveTable { table_id, x, y } => {
                if let Some(table) = self.tables.get_mut(&table_id) {
                    table.x = x.max(0.0);
                    table.y = y.max(0.0);
                }
            }

            Action::UpdateTable { table_id, update } => {
                if let Some(table) = self.tables.get_mut(&table_id) {
                    if let Some(name) = update.name {
                        table.name = name;
                    }
                    if let Some(subtitle) = update.subtitle {
                        table.subtitle = subtitle;
                    }
                    if let Some(color) = update.color {
                        table.color = color;
                    }
                }
            }

            Action::UpdateColumn {
                table_id,
                column_id,
                update,
            } => {
                if let Some(col) = self.column_mut(&table_id, &column_id) {
                    if let Some(name) = update.name {
                        col.name = name;
                    }
                    if let Some(typ) = update.typ {
                        col.typ = typ;
                    }
                    if let Some(pk) = update.is_primary_key {
                        col.is_primary_key = pk;
                    }
                    if let Some(fk) = update.is_foreign_key {
                        col.is_foreign_key = fk;
                    }
                }
            }

            Action::AddColumn { table_id, column } => {
                if let Some(table) = self.tables.get_mut(&table_id) {
                    table.columns.push(column);
                }
            }

            Action::DeleteColumn {
                table_id,
                column_id,
            } => {
                if let Some(table) = self.tables.get_mut(&table_id) {
                    table.columns.retain(|c| c.id != column_id);
                    self.relationships
                        .retain(|r| !r.touches_column(&table_id, &column_id));
                }
            }

            Action::AddTable(table) => {
                self.tables.insert(table.id.clone(), table);
            }

            Action::DeleteTable { table_id } => {
                if self.tables.remove(&table_id).is_some() {
                    self.relationships.retain(|r| !r.touches_table(&table_id));
                }
            }

            Action::AddRelationship(relationship) => {
                self.relationships.push(relationship);
            }

            Action::UpdateRelationship {
                relationship_id,
                update,
            } => {
                if let Some(rel) = self
                    .relationships
                    .iter_mut()
                    .find(|r| r.id == relationship_id)
                {
                    if let Some(v) = update.from_table_id {
                        rel.from_table_id = v;
                    }
                    if let Some(v) = update.from_column_id {
                        rel.from_column_id = v;
                    }
                    if let Some(v) = update.to_table_id {
                        rel.to_table_id = v;
                    }
                    if let Some(v) = update.to_column_id {
                        rel.to_column_id = v;
                    }
                    if let Some(v) = update.cardinality {
                        rel.cardinality = v;
                    }
                }
            }

            Action::DeleteRelationship { relationship_id } => {
                self.relationships.retain(|r| r.id != relationship_id);
            }

            Action::ToggleCollapse { table_id } => {
                if let Some(table) = self.tables.get_mut(&table_id) {
                    table.collapsed = !table.collapsed;
                }
            }

            Action::ToggleColumnCollapse {
                table_id,
                column_id,
            } => {
                if let Some(col) = self.column_mut(&table_id, &column_id) {
                    col.collapsed = Some(!col.is_collapsed());
                }
            }

            Action::UpdateColumnMetadata {
                table_id,
                column_id,
                description,
                metadata,
            } => {
                if let Some(col) = self.column_mut(&table_id, &column_id) {
                    if description.is_some() {
                        col.description = description;
                    }
                    if metadata.is_some() {
                        col.metadata = metadata;
                    }
                }
            }

            Action::AddCustomField(field) => {
                self.custom_field_definitions.push(field);
            }

            Action::RenameCustomField { field_id, new_name } => {
                let renamed = self
                    .custom_field_definitions
                    .iter_mut()
                    .find(|f| f.id == field_id)
                    .map(|f| std::mem::replace(&mut f.name, new_name.clone()));
                if let Some(old_name) = renamed {
                    self.for_each_metadata(|meta| {
                        if let Some(value) = meta.remove(&old_name) {
                            meta.insert(new_name.clone(), value);
                        }
                    });
                }
            }

            Action::DeleteCustomField { field_id } => {
                if let Some(pos) = self
                    .custom_field_definitions
                    .iter()
                    .position(|f| f.id == field_id)
                {
                    let field = self.custom_field_definitions.remove(pos);
                    self.for_each_metadata(|meta| {
                        meta.remove(&field.name);
                    });
                }
            }

            Action::Reset => return Self::default(),
        }
        self
    }

    /// Re-infer relationships over every table.
    ///
    /// Manual relationships survive, inferred ones are replaced, and the
    /// newly referenced columns are marked as foreign keys.
    pub fn regenerate_relationships(self, inferrer: &RelationshipInferrer) -> Self {
        let relationships = inferrer.infer(&self.tables);
        let tables = mark_foreign_keys(&self.tables, &relationships);
        self.reduce(Action::GenerateRelationships {
            tables,
            relationships,
        })
    }

    pub fn to_json(&self) -> Result<String, DiagramError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        Ok(serde_json::from_str(json)?)
    }

    fn column_mut(&mut self, table_id: &str, column_id: &str) -> Option<&mut Column> {
        self.tables
            .get_mut(table_id)?
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
    }

    fn for_each_metadata(&mut self, mut f: impl FnMut(&mut BTreeMap<String, String>)) {
        for table in self.tables.values_mut() {
            for col in &mut table.columns {
                if let Some(meta) = col.metadata.as_mut() {
                    f(meta);
                }
            }
        }
    }
}
