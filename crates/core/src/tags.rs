//! Tag cleanup for Hoarder bookmarks

use std::collections::HashSet;

use serde_json::Value;

/// Normalize a list of raw tag values
///
/// Keeps string entries only, trims them, drops empty results and removes
/// duplicates (exact, case-sensitive match) while preserving the order in
/// which tags were first seen.
pub fn normalize_tags<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut seen: HashSet<&str> = HashSet::new();

    tags.into_iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && seen.insert(*tag))
        .map(str::to_string)
        .collect()
}

/// Normalize the `tags` field of a bookmark, whatever shape it has
///
/// Only arrays carry tags. Anything else (absent, `null`, strings, objects) yields
/// no tags.
pub fn normalize_tag_value(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => normalize_tags(items),
        _ => Vec::new(),
    }
}
