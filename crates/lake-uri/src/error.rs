//! Error types for path and URI conversion.

use thiserror::Error;

/// Errors that can occur while converting between paths and URIs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    /// The URI uses a scheme other than `file`.
    #[error("invalid URI {uri}: expected scheme 'file', found '{scheme}'")]
    InvalidScheme { uri: String, scheme: String },

    /// The URI could not be parsed.
    #[error("invalid URI {uri}: {reason}")]
    Malformed { uri: String, reason: &'static str },

    /// The path is not absolute under the requested platform mode.
    #[error("path is not absolute: {path}")]
    NotAbsolute { path: String },

    /// The path cannot be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },
}

/// Result type for URI operations.
pub type Result<T> = std::result::Result<T, UriError>;
