use crate::prelude::{eprintln, println, *};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hoardwarden_core::convert::convert_export;
use hoardwarden_core::linkwarden::BuildOptions;
use hoardwarden_core::render::to_ascii_pretty_json;

#[derive(Debug, Clone, clap::Args)]
pub struct ConvertOptions {
    /// Path to the Hoarder export JSON file.
    pub hoarder_export: PathBuf,

    /// Where to write the transformed Linkwarden JSON file.
    #[clap(short, long)]
    pub output: PathBuf,

    /// Linkwarden user identifier to attach to collections and links.
    #[clap(long, env = "HOARDWARDEN_USER_ID", default_value_t = 1)]
    pub user_id: u64,

    /// Optional hex color (e.g. #0ea5e9) to assign to generated collections.
    #[clap(long, env = "HOARDWARDEN_COLLECTION_COLOR")]
    pub collection_color: Option<String>,
}

/// Counts reported once the import file is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub total_links: usize,
    pub total_collections: usize,
    pub output: PathBuf,
}

impl ConversionSummary {
    /// Line printed after a successful run
    pub fn message(&self) -> String {
        format!(
            "Converted {} bookmarks into {} Linkwarden collection(s) -> {}",
            self.total_links,
            self.total_collections,
            self.output.display()
        )
    }
}

/// Module entry point
pub fn run(options: ConvertOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Hoarder export: {}", options.hoarder_export.display());
        eprintln!("Output: {}", options.output.display());
        eprintln!();
    }

    let summary = convert_file(&options, Utc::now())?;

    println!("{}", summary.message());

    Ok(())
}

/// Read the Hoarder export, convert it and write the Linkwarden import
///
/// Nothing is written unless the whole document was built and serialized.
pub fn convert_file(options: &ConvertOptions, now: DateTime<Utc>) -> Result<ConversionSummary> {
    let export = load_export(&options.hoarder_export)?;

    let build_options = BuildOptions {
        user_id: options.user_id,
        collection_color: options.collection_color.clone(),
    };
    let conversion = convert_export(&export, &build_options, now)?;
    log::debug!(
        "Built {} collection(s) with {} link(s)",
        conversion.total_collections,
        conversion.total_links
    );

    let rendered = to_ascii_pretty_json(&conversion.document)
        .context("Failed to serialize the Linkwarden import")?;
    write_output(&options.output, &rendered)?;

    Ok(ConversionSummary {
        total_links: conversion.total_links,
        total_collections: conversion.total_collections,
        output: options.output.clone(),
    })
}

fn load_export(path: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::InputNotFound(path.display().to_string()),
        _ => Error::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        },
    })?;
    log::debug!("Read {} bytes from {}", raw.len(), path.display());

    let export: serde_json::Value = serde_json::from_str(&raw).map_err(|e| Error::InvalidJson {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if let Some(bookmarks) = export.get("bookmarks").and_then(|b| b.as_array()) {
        log::debug!("Export holds {} bookmark(s)", bookmarks.len());
    }

    Ok(export)
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    let write_error = |e: std::io::Error| Error::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, contents).map_err(write_error)?;
    log::debug!("Wrote {} bytes to {}", contents.len(), path.display());

    Ok(())
}
