//! Export, address and register one REDCap pull.

use std::path::PathBuf;

use lake_model::{CommitInfo, ExportedFile, FileDigest, LakeLayout};
use lake_provenance::GitResolver;
use lake_redcap::{ExportOptions, RedcapClient};
use lake_uri::{PlatformMode, UriError};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{AssetRegistration, AssetVersionId, Catalog, DatasetId, EAV_CSV_FORMAT};
use crate::error::Result;

/// What to pull and how to label it in the catalog.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub study: String,
    pub domain: String,
    pub export: ExportOptions,
    /// Script recorded as the producer of the export, if any.
    pub script: Option<PathBuf>,
    /// Directory in which to look up the git repository.
    pub repo_dir: PathBuf,
    pub short_commit: bool,
    /// Also ask the catalog to derive a dataset from the new asset.
    pub transform: bool,
    /// Path convention used for the recorded `file://` URI.
    pub uri_mode: PlatformMode,
}

impl IngestRequest {
    pub fn new(study: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            study: study.into(),
            domain: domain.into(),
            export: ExportOptions::default(),
            script: None,
            repo_dir: PathBuf::from("."),
            short_commit: true,
            transform: false,
            uri_mode: PlatformMode::host(),
        }
    }

    #[must_use]
    pub fn with_export(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    #[must_use]
    pub fn with_script(mut self, repo_dir: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        self.repo_dir = repo_dir.into();
        self.script = Some(script.into());
        self
    }

    #[must_use]
    pub fn with_short_commit(mut self, short: bool) -> Self {
        self.short_commit = short;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: bool) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_uri_mode(mut self, mode: PlatformMode) -> Self {
        self.uri_mode = mode;
        self
    }
}

/// Result of a completed ingest.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub file: ExportedFile,
    pub digest: FileDigest,
    pub uri: String,
    pub provenance: CommitInfo,
    pub asset: AssetVersionId,
    pub dataset: Option<DatasetId>,
}

/// Runs export, digest, URI conversion, provenance and registration in order.
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    client: RedcapClient,
    layout: LakeLayout,
    git: GitResolver,
}

impl IngestPipeline {
    pub fn new(client: RedcapClient, layout: LakeLayout) -> Self {
        Self {
            client,
            layout,
            git: GitResolver::default(),
        }
    }

    #[must_use]
    pub fn with_git_resolver(mut self, git: GitResolver) -> Self {
        self.git = git;
        self
    }

    pub fn layout(&self) -> &LakeLayout {
        &self.layout
    }

    /// Runs one ingest against `catalog`.
    ///
    /// Stops at the first failing step. A file that was exported before a
    /// later step failed stays in `ingests/`.
    pub fn run<C>(&self, catalog: &mut C, request: &IngestRequest) -> Result<IngestOutcome>
    where
        C: Catalog + ?Sized,
    {
        let file = self.client.export_records(&self.layout, &request.export)?;
        let digest = lake_digest::digest_file(&file.path)?;

        let path_text = file.path.to_str().ok_or_else(|| UriError::NonUtf8Path {
            path: file.path.display().to_string(),
        })?;
        let uri = lake_uri::to_uri(path_text, request.uri_mode)?;

        let provenance = match &request.script {
            Some(script) => self
                .git
                .commit_info(&request.repo_dir, script, request.short_commit),
            None => CommitInfo::absent(),
        };
        if request.script.is_some() && provenance.is_absent() {
            warn!("Git provenance unavailable; registering without it");
        }

        let asset = catalog.ingest_file(AssetRegistration {
            study: request.study.clone(),
            domain: request.domain.clone(),
            local_path: file.path.clone(),
            digest_hex: digest.hex.clone(),
            file_uri: uri.clone(),
            provenance: provenance.clone(),
            content_format: EAV_CSV_FORMAT.to_string(),
        })?;

        let dataset = if request.transform {
            Some(catalog.transform_eav_to_dataset(&asset)?)
        } else {
            None
        };

        info!(
            asset = %asset,
            digest = %digest.short(12),
            uri = %uri,
            "Ingest complete"
        );

        Ok(IngestOutcome {
            file,
            digest,
            uri,
            provenance,
            asset,
            dataset,
        })
    }
}
