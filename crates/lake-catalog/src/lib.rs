//! Catalog registration for REDCap lake exports.
//!
//! The [`Catalog`] trait is the seam to whatever system tracks asset
//! versions. [`IngestPipeline`] drives one pull end to end:
//!
//! 1. export EAV records to `<lake_root>/ingests`
//! 2. digest the written file
//! 3. convert its path to a `file://` URI
//! 4. capture git provenance (best effort)
//! 5. register the file with the catalog, optionally deriving a dataset
//!
//! [`ManifestCatalog`] is a local implementation that appends entries to
//! `<lake_root>/catalog/assets.jsonl`.

mod catalog;
mod error;
mod manifest;
mod pipeline;

// === Error Types ===
pub use error::{CatalogError, Result};

// === Catalog Boundary ===
pub use catalog::{AssetRegistration, AssetVersionId, Catalog, DatasetId, EAV_CSV_FORMAT};

// === Manifest Catalog ===
pub use manifest::{MANIFEST_FILE_NAME, ManifestCatalog, ManifestEntry, version_id};

// === Pipeline ===
pub use pipeline::{IngestOutcome, IngestPipeline, IngestRequest};
