//! REDCap extraction: field discovery and EAV record export.
//!
//! This crate talks to a REDCap project's Web API and lands exports in the
//! lake's `ingests/` directory.
//!
//! # Features
//!
//! - **Field discovery**: query the data dictionary and keep the fields that carry data
//! - **EAV export**: one form-encoded request, written to a uniquely named CSV
//! - **Transcoding**: optional conversion of legacy Windows-1252 payloads to UTF-8
//!
//! Every call makes a single attempt. A non-2xx response surfaces as an error
//! carrying the status and response body.
//!
//! # Example
//!
//! ```no_run
//! use lake_model::{LakeLayout, RedcapConfig};
//! use lake_redcap::{ExportOptions, RedcapClient};
//!
//! # fn main() -> lake_redcap::Result<()> {
//! let config = RedcapConfig::new("https://redcap.example.org/api/", "0123456789ABCDEF")?;
//! let layout = LakeLayout::new("/srv/lake")?;
//! let client = RedcapClient::new(config)?;
//!
//! let fields = client.resolve_fields(&[], false)?;
//! let path = client.export(&layout, &ExportOptions::default().with_fields(fields))?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod encoding;
mod error;
mod export;
mod form;
mod metadata;

// === Error Types ===
pub use error::{RedcapError, Result};

// === Client ===
pub use client::RedcapClient;

// === Field Discovery ===
pub use metadata::{metadata_params, resolve_fields};

// === Export ===
pub use encoding::{LEGACY_ENCODING, transcode_legacy};
pub use export::{ExportOptions, export, export_file_name};

// === Wire Encoding ===
pub use form::encode_form;
