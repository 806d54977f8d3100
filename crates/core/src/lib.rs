//! Core library for hoardwarden
//!
//! This crate implements the **Functional Core** of hoardwarden, following the
//! Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`hoardwarden_core`** (this crate): Pure transformation functions with zero I/O
//! - **`hoardwarden`**: File I/O, argument parsing and process exit behavior
//!
//! Nothing in this crate reads files, reads the clock or logs. The run's start time
//! is passed in by the caller, which keeps every conversion reproducible and lets
//! the tests use plain `serde_json::json!` fixtures.
//!
//! # Module Organization
//!
//! - [`timestamp`]: Normalizes epoch and ISO 8601 timestamps to UTC
//! - [`tags`]: Cleans and deduplicates free-text tags
//! - [`hoarder`]: Reads link bookmarks out of a Hoarder export and groups them
//! - [`linkwarden`]: Linkwarden import model and the document builder
//! - [`render`]: ASCII-only pretty JSON output
//! - [`convert`]: The end-to-end pipeline
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use hoardwarden_core::convert::convert_export;
//! use hoardwarden_core::linkwarden::BuildOptions;
//! use hoardwarden_core::render::to_ascii_pretty_json;
//!
//! let export = serde_json::json!({
//!     "bookmarks": [
//!         { "title": "A", "content": { "type": "link", "url": "https://a" } }
//!     ]
//! });
//!
//! let conversion = convert_export(&export, &BuildOptions::default(), chrono::Utc::now())?;
//! assert_eq!(conversion.total_links, 1);
//!
//! let json = to_ascii_pretty_json(&conversion.document)?;
//! ```

pub mod convert;
pub mod error;
pub mod hoarder;
pub mod linkwarden;
pub mod render;
pub mod tags;
pub mod timestamp;

pub use error::ConvertError;
