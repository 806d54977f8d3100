//! Linkwarden import document model and builder
//!
//! Linkwarden imports a full user export: the user's preferences plus every
//! collection with its links. Hoarder only provides the links, so most of the
//! document is filled with Linkwarden's defaults.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::hoarder::{GroupedLinks, LinkRecord};
use crate::timestamp::to_iso;

/// Options that apply to every generated collection and link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Owner and creator of every collection and link
    pub user_id: u64,
    /// Hex color (e.g. `#0ea5e9`) assigned to every collection
    pub collection_color: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            user_id: 1,
            collection_color: None,
        }
    }
}

/// Root of a Linkwarden import: one user with its preferences and collections
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkwardenImport {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    pub email_verified: Option<String>,
    pub unverified_new_email: Option<String>,
    pub image: Option<String>,
    pub locale: String,
    pub parent_subscription_id: Option<u64>,
    pub collection_order: Vec<u64>,
    pub links_route_to: String,
    pub ai_tagging_method: String,
    pub ai_predefined_tags: Vec<String>,
    pub ai_tag_existing_links: bool,
    pub theme: String,
    pub readable_font_family: String,
    pub readable_font_size: String,
    pub readable_line_height: String,
    pub readable_line_width: String,
    pub prevent_duplicate_links: bool,
    pub archive_as_screenshot: bool,
    pub archive_as_monolith: bool,
    #[serde(rename = "archiveAsPDF")]
    pub archive_as_pdf: bool,
    pub archive_as_readable: bool,
    pub archive_as_wayback_machine: bool,
    pub is_private: bool,
    pub referred_by: Option<String>,
    pub last_picked_at: Option<String>,
    pub accept_promotional_emails: bool,
    pub trial_end_email_sent: bool,
    pub created_at: String,
    pub updated_at: String,
    pub collections: Vec<LinkwardenCollection>,
    pub pinned_links: Option<Vec<Value>>,
    pub whitelisted_users: Option<Vec<Value>>,
}

impl LinkwardenImport {
    /// Skeleton with Linkwarden's default preferences and no collections
    pub fn base_payload(now: DateTime<Utc>) -> Self {
        let now = to_iso(&now);

        Self {
            name: String::new(),
            username: String::new(),
            email: None,
            email_verified: None,
            unverified_new_email: None,
            image: None,
            locale: "en".to_string(),
            parent_subscription_id: None,
            collection_order: Vec::new(),
            links_route_to: "ORIGINAL".to_string(),
            ai_tagging_method: "DISABLED".to_string(),
            ai_predefined_tags: Vec::new(),
            ai_tag_existing_links: false,
            theme: "dark".to_string(),
            readable_font_family: "sans-serif".to_string(),
            readable_font_size: "18px".to_string(),
            readable_line_height: "1.6".to_string(),
            readable_line_width: "normal".to_string(),
            prevent_duplicate_links: false,
            archive_as_screenshot: true,
            archive_as_monolith: true,
            archive_as_pdf: true,
            archive_as_readable: true,
            archive_as_wayback_machine: false,
            is_private: false,
            referred_by: None,
            last_picked_at: Some(now.clone()),
            accept_promotional_emails: false,
            trial_end_email_sent: false,
            created_at: now.clone(),
            updated_at: now,
            collections: Vec::new(),
            pinned_links: Some(Vec::new()),
            whitelisted_users: Some(Vec::new()),
        }
    }

    /// Iterate over every link of every collection, in emission order
    pub fn links(&self) -> impl Iterator<Item = &LinkwardenLink> {
        self.collections
            .iter()
            .flat_map(|collection| collection.links.iter())
    }
}

/// Linkwarden collection
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkwardenCollection {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub icon_weight: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<u64>,
    pub is_public: bool,
    pub owner_id: u64,
    pub created_by_id: u64,
    pub created_at: String,
    pub updated_at: String,
    pub rss_subscriptions: Vec<Value>,
    pub links: Vec<LinkwardenLink>,
}

/// Linkwarden link
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkwardenLink {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub description: String,
    pub created_by_id: u64,
    pub collection_id: u64,
    pub icon: Option<String>,
    pub icon_weight: Option<String>,
    pub color: Option<String>,
    pub url: String,
    pub client_side: bool,
    pub ai_tagged: bool,
    pub index_version: Option<u32>,
    pub last_preserved: Option<String>,
    pub import_date: String,
    pub created_at: String,
    pub updated_at: String,
    pub tags: Vec<LinkwardenTag>,
}

/// Tag attached to a Linkwarden link
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct LinkwardenTag {
    pub name: String,
}

/// Build a Linkwarden import document from grouped link records
///
/// `base` is cloned and left untouched. Collection ids start at 1 and follow the
/// group order; link ids start at 1 and keep counting across collections. Groups
/// without records are skipped and do not consume an id.
pub fn build_linkwarden_import(
    grouped: &GroupedLinks,
    options: &BuildOptions,
    base: &LinkwardenImport,
) -> LinkwardenImport {
    let mut payload = base.clone();

    let mut collections = Vec::new();
    let mut link_id = 1;
    let mut collection_id = 1;

    for group in grouped.groups() {
        let Some(earliest) = group.records.iter().map(|record| record.created_at).min() else {
            continue;
        };
        let collection_created = to_iso(&earliest);

        let mut links = Vec::with_capacity(group.records.len());
        for record in &group.records {
            links.push(build_link(record, link_id, collection_id, options.user_id));
            link_id += 1;
        }

        collections.push(LinkwardenCollection {
            id: collection_id,
            name: group.name.clone(),
            description: String::new(),
            icon: None,
            icon_weight: None,
            color: options.collection_color.clone(),
            parent_id: None,
            is_public: false,
            owner_id: options.user_id,
            created_by_id: options.user_id,
            created_at: collection_created.clone(),
            updated_at: collection_created,
            rss_subscriptions: Vec::new(),
            links,
        });
        collection_id += 1;
    }

    payload.collections = collections;
    payload.pinned_links.get_or_insert_with(Vec::new);
    payload.whitelisted_users.get_or_insert_with(Vec::new);
    payload
}

fn build_link(record: &LinkRecord, id: u64, collection_id: u64, user_id: u64) -> LinkwardenLink {
    let created = to_iso(&record.created_at);

    LinkwardenLink {
        id,
        name: record.title.clone(),
        link_type: "url".to_string(),
        description: record.description.clone(),
        created_by_id: user_id,
        collection_id,
        icon: None,
        icon_weight: None,
        color: None,
        url: record.url.clone(),
        client_side: false,
        ai_tagged: false,
        index_version: None,
        last_preserved: None,
        import_date: created.clone(),
        created_at: created.clone(),
        updated_at: created,
        tags: record
            .tags
            .iter()
            .map(|tag| LinkwardenTag { name: tag.clone() })
            .collect(),
    }
}
