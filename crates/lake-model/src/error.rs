//! Error types for configuration handling.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling configuration, before any network or file activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required input was absent or blank.
    #[error("missing required configuration: {name}")]
    Missing { name: &'static str },

    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`crate::LakeSettings`].
    #[error("failed to parse settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_display_names_input() {
        let err = ConfigError::Missing { name: "api_token" };
        assert_eq!(
            err.to_string(),
            "missing required configuration: api_token"
        );
    }
}
