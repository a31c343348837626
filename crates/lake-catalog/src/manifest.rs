//! JSON-lines manifest catalog stored inside the lake.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lake_model::{CommitInfo, LakeLayout};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{AssetRegistration, AssetVersionId, Catalog};
use crate::error::{CatalogError, Result};

/// Manifest file name under `<lake_root>/catalog`.
pub const MANIFEST_FILE_NAME: &str = "assets.jsonl";

/// Digest characters used in a version identifier.
const VERSION_DIGEST_LEN: usize = 12;

/// One registered asset version, one JSON object per manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub version: AssetVersionId,
    pub study: String,
    pub domain: String,
    pub local_path: PathBuf,
    pub digest_hex: String,
    pub file_uri: String,
    pub provenance: CommitInfo,
    pub content_format: String,
    pub registered_at: DateTime<Utc>,
}

/// A [`Catalog`] that appends registrations to `catalog/assets.jsonl`.
///
/// Version identifiers are `<study>/<domain>/<first 12 digest chars>`, so
/// registering the same content twice yields the same identifier and
/// appends nothing.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    path: PathBuf,
}

impl ManifestCatalog {
    /// Catalog for the manifest inside `layout`.
    pub fn new(layout: &LakeLayout) -> Self {
        Self::at(layout.catalog_dir().join(MANIFEST_FILE_NAME))
    }

    /// Catalog backed by an explicit manifest file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry. A missing manifest is an empty catalog.
    pub fn entries(&self) -> Result<Vec<ManifestEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error("open", e)),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error("read", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| CatalogError::Manifest {
                path: self.path.clone(),
                line: index + 1,
                source: e,
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Looks up one version by identifier.
    pub fn find(&self, version: &AssetVersionId) -> Result<Option<ManifestEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .find(|entry| &entry.version == version))
    }

    fn append(&self, entry: &ManifestEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CatalogError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut line = serde_json::to_string(entry).map_err(|e| CatalogError::Manifest {
            path: self.path.clone(),
            line: 0,
            source: e,
        })?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error("open", e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error("append to", e))
    }

    fn io_error(&self, action: &'static str, source: std::io::Error) -> CatalogError {
        CatalogError::Io {
            action,
            path: self.path.clone(),
            source,
        }
    }
}

/// Builds the version identifier for a registration.
pub fn version_id(study: &str, domain: &str, digest_hex: &str) -> AssetVersionId {
    let prefix = &digest_hex[..VERSION_DIGEST_LEN.min(digest_hex.len())];
    AssetVersionId::new(format!("{study}/{domain}/{}", prefix.to_ascii_lowercase()))
}

impl Catalog for ManifestCatalog {
    fn ingest_file(&mut self, registration: AssetRegistration) -> Result<AssetVersionId> {
        registration.validate()?;
        let version = version_id(
            &registration.study,
            &registration.domain,
            &registration.digest_hex,
        );

        if let Some(existing) = self.find(&version)? {
            if existing.digest_hex.eq_ignore_ascii_case(&registration.digest_hex) {
                debug!(version = %version, "Asset already registered");
                return Ok(version);
            }
            return Err(CatalogError::Conflict {
                version: version.to_string(),
                existing: existing.digest_hex,
            });
        }

        let entry = ManifestEntry {
            version: version.clone(),
            study: registration.study,
            domain: registration.domain,
            local_path: registration.local_path,
            digest_hex: registration.digest_hex.to_ascii_lowercase(),
            file_uri: registration.file_uri,
            provenance: registration.provenance,
            content_format: registration.content_format,
            registered_at: Utc::now(),
        };
        self.append(&entry)?;

        info!(
            version = %version,
            uri = %entry.file_uri,
            manifest = %self.path.display(),
            "Registered asset version"
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EAV_CSV_FORMAT;
    use lake_model::CommitDetails;

    fn registration(digest: &str) -> AssetRegistration {
        AssetRegistration {
            study: "cardio".to_string(),
            domain: "redcap".to_string(),
            local_path: PathBuf::from("/lake/ingests/a.csv"),
            digest_hex: digest.to_string(),
            file_uri: "file:///lake/ingests/a.csv".to_string(),
            provenance: CommitInfo::resolved(CommitDetails {
                repo_url: "https://github.com/org/repo".to_string(),
                commit: "abc1234".to_string(),
                script_relpath: "scripts/pull.sh".to_string(),
            }),
            content_format: EAV_CSV_FORMAT.to_string(),
        }
    }

    #[test]
    fn test_version_id_uses_digest_prefix() {
        let id = version_id("cardio", "redcap", &"0123456789ABCDEF".repeat(4));
        assert_eq!(id.as_str(), "cardio/redcap/0123456789ab");
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ManifestCatalog::at(dir.path().join("none.jsonl"));
        assert!(catalog.entries().unwrap().is_empty());
    }

    #[test]
    fn test_ingest_appends_entry() {
        let dir = tempfile::tempdir().unwrap();
        let layout = LakeLayout::new(dir.path()).unwrap();
        let mut catalog = ManifestCatalog::new(&layout);

        let digest = "f".repeat(64);
        let id = catalog.ingest_file(registration(&digest)).unwrap();
        assert_eq!(id.as_str(), "cardio/redcap/ffffffffffff");
        assert_eq!(catalog.path(), layout.catalog_dir().join("assets.jsonl"));

        let entries = catalog.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].version, id);
        assert_eq!(entries[0].provenance.commit(), Some("abc1234"));
    }

    #[test]
    fn test_same_digest_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ManifestCatalog::at(dir.path().join("assets.jsonl"));
        let digest = "1".repeat(64);

        let first = catalog.ingest_file(registration(&digest)).unwrap();
        let second = catalog.ingest_file(registration(&digest)).unwrap();
        assert_eq!(first, second);
        assert_eq!(catalog.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_prefix_collision_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ManifestCatalog::at(dir.path().join("assets.jsonl"));
        let a = format!("{}{}", "2".repeat(12), "a".repeat(52));
        let b = format!("{}{}", "2".repeat(12), "b".repeat(52));

        catalog.ingest_file(registration(&a)).unwrap();
        assert!(matches!(
            catalog.ingest_file(registration(&b)),
            Err(CatalogError::Conflict { .. })
        ));
    }

    #[test]
    fn test_corrupt_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.jsonl");
        fs::write(&path, "\nnot json\n").unwrap();

        let err = ManifestCatalog::at(&path).entries().unwrap_err();
        assert!(matches!(err, CatalogError::Manifest { line: 2, .. }));
    }

    #[test]
    fn test_invalid_registration_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ManifestCatalog::at(dir.path().join("assets.jsonl"));
        assert!(catalog.ingest_file(registration("xyz")).is_err());
        assert!(!catalog.path().exists());
    }
}
