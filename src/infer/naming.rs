//! Name normalization used by the matching strategies.

use regex::Regex;
use std::sync::LazyLock;

/// Two-character legacy prefix: an uppercase letter then an uppercase letter
/// or digit (`O0BCTN`, `PDDIV`).
static LEGACY_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]").unwrap());

static CAMEL_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)Id$").unwrap());

/// Strip a legacy two-character prefix (`O0BCTN` -> `BCTN`).
///
/// Names shorter than three characters, or not of that shape, are returned
/// as is. This is purely syntactic: unrelated columns can share a suffix.
pub fn column_suffix(name: &str) -> &str {
    if LEGACY_PREFIX.is_match(name) && name.chars().count() > 2 {
        // Both prefix characters are ASCII.
        &name[2..]
    } else {
        name
    }
}

pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{word}s")
    }
}

pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if word.ends_with("ses") || word.ends_with("xes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Whether a lower-cased reference token (`user` from `user_id`) names the
/// table, directly or through its plural/singular form.
pub fn refers_to_table(reference: &str, table_name: &str) -> bool {
    let target = table_name.to_lowercase();
    target == reference || target == pluralize(reference) || singularize(&target) == reference
}

/// `user` for `user_id` / `USER_ID`.
pub fn snake_reference(column_name: &str) -> Option<String> {
    column_name
        .to_lowercase()
        .strip_suffix("_id")
        .map(str::to_string)
}

/// `order` for `orderId`. The `Id` suffix is case-sensitive.
pub fn camel_reference(column_name: &str) -> Option<String> {
    CAMEL_ID
        .captures(column_name)
        .map(|caps| caps[1].to_lowercase())
}
