//! Foreign-key flagging from relationship "to" ends.

use crate::model::{Relationship, Table};
use std::collections::{BTreeMap, HashSet};

/// Copy of `tables` with every column on the "to" side of a relationship
/// flagged as a foreign key.
///
/// Flags are only ever set, never cleared. Relationship ends that name a
/// missing table or column are ignored.
pub fn mark_foreign_keys(
    tables: &BTreeMap<String, Table>,
    relationships: &[Relationship],
) -> BTreeMap<String, Table> {
    let referencing: HashSet<(&str, &str)> = relationships
        .iter()
        .map(|r| (r.to_table_id.as_str(), r.to_column_id.as_str()))
        .collect();

    tables
        .iter()
        .map(|(id, table)| {
            let mut table = table.clone();
            for col in &mut table.columns {
                col.is_foreign_key |= referencing.contains(&(id.as_str(), col.id.as_str()));
            }
            (id.clone(), table)
        })
        .collect()
}
