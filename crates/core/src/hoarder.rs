//! Transformation functions for Hoarder bookmark exports
//!
//! Reads the `bookmarks` list of a Hoarder export, keeps link bookmarks only and
//! turns each one into a [`LinkRecord`] with cleaned up fields. Records are
//! grouped by collection name, in insertion order.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConvertError;
use crate::tags::normalize_tag_value;
use crate::timestamp::normalize_timestamp;

/// Collection every imported bookmark lands in
pub const DEFAULT_COLLECTION_NAME: &str = "Hoarder Import";

/// Content type of the bookmarks that get converted
pub const LINK_CONTENT_TYPE: &str = "link";

/// Bookmark entry from a Hoarder export
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoarderBookmark {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Usually a list of strings, but kept raw so bad entries can be dropped one by one
    #[serde(default)]
    pub tags: Option<Value>,
    /// Epoch seconds or an ISO 8601 string, depending on the export version
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub content: Option<HoarderContent>,
}

/// Content descriptor of a Hoarder bookmark
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HoarderContent {
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A link bookmark after field cleanup
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    pub title: String,
    pub url: String,
    pub description: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Records that belong to the same collection
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGroup {
    pub name: String,
    pub records: Vec<LinkRecord>,
}

/// Ordered mapping from collection name to its records
///
/// Groups keep the order in which their names were first seen, and records keep
/// the order in which they were pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedLinks {
    groups: Vec<LinkGroup>,
}

impl GroupedLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pre-assembled groups. Groups sharing a name are merged.
    pub fn from_groups(groups: Vec<LinkGroup>) -> Self {
        let mut grouped = Self::new();
        for group in groups {
            let index = grouped.group_index(group.name);
            grouped.groups[index].records.extend(group.records);
        }
        grouped
    }

    /// Append a record to the named group, creating the group if needed
    pub fn push(&mut self, name: impl Into<String>, record: LinkRecord) {
        let index = self.group_index(name.into());
        self.groups[index].records.push(record);
    }

    pub fn groups(&self) -> &[LinkGroup] {
        &self.groups
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&LinkGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Number of records across all groups
    pub fn total_links(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }

    /// True when no group holds a record
    pub fn is_empty(&self) -> bool {
        self.total_links() == 0
    }

    fn group_index(&mut self, name: String) -> usize {
        match self.groups.iter().position(|group| group.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(LinkGroup {
                    name,
                    records: Vec::new(),
                });
                self.groups.len() - 1
            }
        }
    }
}

/// Group key used when no categorization is configured
pub fn default_group_key(_bookmark: &HoarderBookmark) -> String {
    DEFAULT_COLLECTION_NAME.to_string()
}

/// Return the raw `bookmarks` entries of a Hoarder export
pub fn bookmark_entries(export: &Value) -> Result<&[Value], ConvertError> {
    match export.get("bookmarks") {
        None => Err(ConvertError::MissingBookmarks),
        Some(Value::Array(entries)) => Ok(entries.as_slice()),
        Some(_) => Err(ConvertError::BookmarksNotList),
    }
}

/// Turn a single bookmark into a link record
///
/// Returns `None` for non-link content and for links without a URL. Missing
/// creation dates resolve to `now`.
pub fn to_link_record(bookmark: &HoarderBookmark, now: DateTime<Utc>) -> Option<LinkRecord> {
    let content = bookmark.content.as_ref()?;
    if content.content_type.as_deref() != Some(LINK_CONTENT_TYPE) {
        return None;
    }
    let url = content.url.as_deref().filter(|url| !url.is_empty())?;

    let title = bookmark
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .unwrap_or(url);

    Some(LinkRecord {
        title: title.to_string(),
        url: url.to_string(),
        description: bookmark.note.clone().unwrap_or_default(),
        tags: normalize_tag_value(bookmark.tags.as_ref()),
        created_at: normalize_timestamp(bookmark.created_at.as_ref(), now).instant,
    })
}

/// Collect the link bookmarks of a Hoarder export into the default collection
pub fn collect_links(export: &Value, now: DateTime<Utc>) -> Result<GroupedLinks, ConvertError> {
    collect_links_with(export, now, default_group_key)
}

/// Collect the link bookmarks of a Hoarder export, grouping with `group_key`
///
/// Hoarder stores bookmarks newest first, so entries are walked in reverse to
/// keep the oldest bookmark first in every group. Entries that cannot be read
/// as a bookmark are skipped.
pub fn collect_links_with<F>(
    export: &Value,
    now: DateTime<Utc>,
    group_key: F,
) -> Result<GroupedLinks, ConvertError>
where
    F: Fn(&HoarderBookmark) -> String,
{
    let entries = bookmark_entries(export)?;
    let mut grouped = GroupedLinks::new();

    for entry in entries.iter().rev() {
        let Ok(bookmark) = HoarderBookmark::deserialize(entry) else {
            continue;
        };
        let Some(record) = to_link_record(&bookmark, now) else {
            continue;
        };
        grouped.push(group_key(&bookmark), record);
    }

    if grouped.is_empty() {
        return Err(ConvertError::NoLinkBookmarks);
    }

    Ok(grouped)
}
