//! The boundary between ingestion and whatever catalog stores asset versions.

use std::fmt;
use std::path::PathBuf;

use lake_model::CommitInfo;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Content format recorded for REDCap EAV exports.
pub const EAV_CSV_FORMAT: &str = "csv/eav";

/// Opaque identifier of one registered asset version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetVersionId(String);

impl AssetVersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a dataset derived from an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a catalog needs to register one exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistration {
    pub study: String,
    pub domain: String,
    pub local_path: PathBuf,
    /// Lowercase SHA-256 hex of the file contents.
    pub digest_hex: String,
    pub file_uri: String,
    pub provenance: CommitInfo,
    pub content_format: String,
}

impl AssetRegistration {
    /// Checks the fields a catalog keys on.
    ///
    /// Study and domain must be non-empty and free of `/`; the digest must be
    /// 64 hex characters.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("study", &self.study), ("domain", &self.domain)] {
            if value.trim().is_empty() {
                return Err(CatalogError::InvalidRegistration {
                    reason: format!("{name} is empty"),
                });
            }
            if value.contains('/') {
                return Err(CatalogError::InvalidRegistration {
                    reason: format!("{name} '{value}' contains '/'"),
                });
            }
        }
        if self.digest_hex.len() != 64 || !self.digest_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CatalogError::InvalidRegistration {
                reason: format!("digest '{}' is not a SHA-256 hex string", self.digest_hex),
            });
        }
        Ok(())
    }
}

/// A store of asset versions.
///
/// Implementations decide how identifiers are minted; callers treat them as
/// opaque.
pub trait Catalog {
    /// Registers an exported file and returns its version identifier.
    fn ingest_file(&mut self, registration: AssetRegistration) -> Result<AssetVersionId>;

    /// Derives a tabular dataset from a registered EAV asset.
    fn transform_eav_to_dataset(&mut self, asset: &AssetVersionId) -> Result<DatasetId> {
        let _ = asset;
        Err(CatalogError::Unsupported {
            operation: "transform_eav_to_dataset",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> AssetRegistration {
        AssetRegistration {
            study: "cardio".to_string(),
            domain: "redcap".to_string(),
            local_path: PathBuf::from("/lake/ingests/x.csv"),
            digest_hex: "a".repeat(64),
            file_uri: "file:///lake/ingests/x.csv".to_string(),
            provenance: CommitInfo::absent(),
            content_format: EAV_CSV_FORMAT.to_string(),
        }
    }

    struct NullCatalog;

    impl Catalog for NullCatalog {
        fn ingest_file(&mut self, registration: AssetRegistration) -> Result<AssetVersionId> {
            Ok(AssetVersionId::new(registration.study))
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_empty_study_rejected() {
        let mut reg = registration();
        reg.study = "  ".to_string();
        assert!(matches!(
            reg.validate(),
            Err(CatalogError::InvalidRegistration { .. })
        ));
    }

    #[test]
    fn test_slash_in_domain_rejected() {
        let mut reg = registration();
        reg.domain = "a/b".to_string();
        assert!(reg.validate().is_err());
    }

    #[test]
    fn test_short_digest_rejected() {
        let mut reg = registration();
        reg.digest_hex = "abc".to_string();
        assert!(reg.validate().is_err());
    }

    #[test]
    fn test_transform_defaults_to_unsupported() {
        let mut catalog = NullCatalog;
        let id = catalog.ingest_file(registration()).unwrap();
        assert_eq!(id.as_str(), "cardio");
        assert!(matches!(
            catalog.transform_eav_to_dataset(&id),
            Err(CatalogError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = AssetVersionId::new("cardio/redcap/0123456789ab");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"cardio/redcap/0123456789ab\""
        );
        assert_eq!(DatasetId::new("d1").to_string(), "d1");
    }
}
