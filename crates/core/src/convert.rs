//! Hoarder to Linkwarden conversion pipeline
//!
//! Composes extraction, normalization and document building. The caller provides
//! the run's start time so the whole conversion is deterministic.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ConvertError;
use crate::hoarder::collect_links;
use crate::linkwarden::{build_linkwarden_import, BuildOptions, LinkwardenImport};

/// Result of a conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub document: LinkwardenImport,
    pub total_links: usize,
    pub total_collections: usize,
}

/// Convert a parsed Hoarder export into a Linkwarden import document
pub fn convert_export(
    export: &Value,
    options: &BuildOptions,
    now: DateTime<Utc>,
) -> Result<Conversion, ConvertError> {
    let grouped = collect_links(export, now)?;
    let base = LinkwardenImport::base_payload(now);
    let document = build_linkwarden_import(&grouped, options, &base);

    Ok(Conversion {
        total_links: grouped.total_links(),
        total_collections: document.collections.len(),
        document,
    })
}
