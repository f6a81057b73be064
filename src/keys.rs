//! Primary key detection from column names.

use crate::model::ParsedColumn;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static PK_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)^id$").unwrap(),
        Regex::new(r"(?i)_id$").unwrap(),
        Regex::new(r"(?i)^pk$").unwrap(),
        Regex::new(r"(?i)key$").unwrap(),
    ]
});

pub fn looks_like_key(name: &str) -> bool {
    PK_PATTERNS.iter().any(|p| p.is_match(name))
}

/// Names of the primary key column(s) of a table.
///
/// Every column whose name looks like a key is selected, so composite keys
/// come out naturally. Without any match the first column is the key.
pub fn detect_primary_key(columns: &[ParsedColumn]) -> BTreeSet<String> {
    let keys: BTreeSet<String> = columns
        .iter()
        .filter(|c| looks_like_key(&c.name))
        .map(|c| c.name.clone())
        .collect();

    if !keys.is_empty() {
        return keys;
    }
    columns.first().map(|c| c.name.clone()).into_iter().collect()
}
