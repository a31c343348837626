//! Source-control provenance attached to ingested files.

use serde::{Deserialize, Serialize};

/// Resolved commit details. All three values are always known together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    /// Browsable repository URL (SSH remotes normalized to HTTPS).
    pub repo_url: String,
    pub commit: String,
    /// Script path relative to the repository root, `/`-separated.
    pub script_relpath: String,
}

/// Provenance of the script that produced an ingest.
///
/// Either fully resolved or fully absent; a partial value cannot be built.
/// Serializes as `{repo_url, commit, script_relpath}` with `null` for absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CommitInfoRepr", into = "CommitInfoRepr")]
pub struct CommitInfo {
    details: Option<CommitDetails>,
}

impl CommitInfo {
    /// Provenance with every field absent.
    #[must_use]
    pub const fn absent() -> Self {
        Self { details: None }
    }

    #[must_use]
    pub fn resolved(details: CommitDetails) -> Self {
        Self {
            details: Some(details),
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.details.is_none()
    }

    pub fn details(&self) -> Option<&CommitDetails> {
        self.details.as_ref()
    }

    pub fn repo_url(&self) -> Option<&str> {
        self.details.as_ref().map(|d| d.repo_url.as_str())
    }

    pub fn commit(&self) -> Option<&str> {
        self.details.as_ref().map(|d| d.commit.as_str())
    }

    pub fn script_relpath(&self) -> Option<&str> {
        self.details.as_ref().map(|d| d.script_relpath.as_str())
    }
}

#[derive(Serialize, Deserialize)]
struct CommitInfoRepr {
    repo_url: Option<String>,
    commit: Option<String>,
    script_relpath: Option<String>,
}

impl From<CommitInfoRepr> for CommitInfo {
    fn from(repr: CommitInfoRepr) -> Self {
        match (repr.repo_url, repr.commit, repr.script_relpath) {
            (Some(repo_url), Some(commit), Some(script_relpath)) => {
                Self::resolved(CommitDetails {
                    repo_url,
                    commit,
                    script_relpath,
                })
            }
            _ => Self::absent(),
        }
    }
}

impl From<CommitInfo> for CommitInfoRepr {
    fn from(info: CommitInfo) -> Self {
        match info.details {
            Some(d) => Self {
                repo_url: Some(d.repo_url),
                commit: Some(d.commit),
                script_relpath: Some(d.script_relpath),
            },
            None => Self {
                repo_url: None,
                commit: None,
                script_relpath: None,
            },
        }
    }
}
