//! Error types for REDCap extraction.

use std::path::PathBuf;

use lake_model::ConfigError;
use thiserror::Error;

/// Errors that can occur while talking to REDCap or writing exports.
#[derive(Debug, Error)]
pub enum RedcapError {
    // === API Errors ===
    /// The metadata endpoint answered with a non-success status.
    #[error("metadata request failed with status {status}: {body}")]
    MetadataRequest { status: u16, body: String },

    /// The record export answered with a non-success status.
    #[error("export request failed with status {status}: {body}")]
    ExportRequest { status: u16, body: String },

    /// The metadata response was not a JSON array of field records.
    #[error("failed to parse metadata response: {message}")]
    MetadataParse { message: String },

    /// The request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("request to REDCap failed: {0}")]
    Transport(#[from] reqwest::Error),

    // === File System Errors ===
    /// Creating the ingest directory or writing the export failed.
    #[error("failed to {action} {path}: {source}")]
    FileSystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Encoding Errors ===
    /// The response could not be transcoded to UTF-8.
    #[error("response body is not valid {encoding} text")]
    Encoding { encoding: &'static str },

    // === Configuration Errors ===
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RedcapError {
    /// HTTP status of an API rejection, if this error is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::MetadataRequest { status, .. } | Self::ExportRequest { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Result type for REDCap operations.
pub type Result<T> = std::result::Result<T, RedcapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_show_status_and_body() {
        let err = RedcapError::ExportRequest {
            status: 500,
            body: "Invalid token".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("Invalid token"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_file_system_error_names_path() {
        let err = RedcapError::FileSystem {
            action: "create directory",
            path: PathBuf::from("/lake/ingests"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("failed to create directory /lake/ingests"));
        assert_eq!(err.status(), None);
    }
}
