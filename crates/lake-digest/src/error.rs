//! Error types for digest computation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while digesting a file.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
