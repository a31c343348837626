//! Error types for catalog registration and the ingest pipeline.

use std::path::PathBuf;

use lake_digest::DigestError;
use lake_model::ConfigError;
use lake_redcap::RedcapError;
use lake_uri::UriError;
use thiserror::Error;

/// Errors raised while registering assets or running an ingest.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Redcap(#[from] RedcapError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error(transparent)]
    Uri(#[from] UriError),

    /// A registration is missing a value or carries one the catalog cannot key on.
    #[error("invalid asset registration: {reason}")]
    InvalidRegistration { reason: String },

    /// Two different digests map to the same version identifier.
    #[error("asset version {version} already registered with digest {existing}")]
    Conflict { version: String, existing: String },

    /// The manifest could not be read or appended to.
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest line is not a valid entry.
    #[error("corrupt manifest {path} at line {line}: {source}")]
    Manifest {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The catalog does not implement the requested operation.
    #[error("catalog does not support {operation}")]
    Unsupported { operation: &'static str },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: CatalogError = RedcapError::ExportRequest {
            status: 403,
            body: "You do not have permissions".to_string(),
        }
        .into();
        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("You do not have permissions"));
    }

    #[test]
    fn test_unsupported_names_operation() {
        let err = CatalogError::Unsupported {
            operation: "transform_eav_to_dataset",
        };
        assert_eq!(
            err.to_string(),
            "catalog does not support transform_eav_to_dataset"
        );
    }
}
