//! Content digests of files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Hash algorithm used for content addressing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
}

impl DigestAlgorithm {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Length of the lowercase hex representation.
    #[must_use]
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Digest of a file's full byte content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDigest {
    pub algorithm: DigestAlgorithm,
    /// Lowercase hexadecimal digest.
    pub hex: String,
    /// File the digest was computed over.
    pub subject: PathBuf,
}

impl FileDigest {
    /// Leading characters of the hex digest, for short identifiers.
    pub fn short(&self, len: usize) -> &str {
        &self.hex[..len.min(self.hex.len())]
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}
