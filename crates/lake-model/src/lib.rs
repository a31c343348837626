//! Shared data model for REDCap extraction and lake ingestion.
//!
//! Every crate in the workspace speaks in these types:
//!
//! - **Configuration**: [`RedcapConfig`], [`LakeLayout`] and the file-backed [`LakeSettings`]
//! - **Metadata**: [`FieldMetadata`] records parsed from the REDCap metadata endpoint
//! - **Exports**: [`ExportRequest`] form parameters and the [`ExportedFile`] they produce
//! - **Content addressing**: [`FileDigest`]
//! - **Provenance**: [`CommitInfo`]

mod config;
mod digest;
mod error;
mod export;
mod metadata;
mod provenance;

// === Error Types ===
pub use error::{ConfigError, Result};

// === Configuration ===
pub use config::{LakeLayout, LakeSettings, RedcapConfig, ResolvedSettings};

// === Metadata ===
pub use metadata::{FieldMetadata, NON_DATA_FIELD_TYPES, exportable_field_names};

// === Exports ===
pub use export::{ExportRequest, ExportedFile, FileEncoding};

// === Content Addressing ===
pub use digest::{DigestAlgorithm, FileDigest};

// === Provenance ===
pub use provenance::{CommitDetails, CommitInfo};
