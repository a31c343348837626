//! Source-control provenance for ingested files.
//!
//! Provenance capture is strictly best-effort: if `git` is missing, the
//! directory is not inside a repository, or no `origin` remote is configured,
//! the result is an all-absent [`CommitInfo`] and the caller's ingest goes on.
//!
//! ```no_run
//! use std::path::Path;
//! use lake_provenance::git_commit_info;
//!
//! let info = git_commit_info(Path::new("."), Path::new("scripts/pull_redcap.sh"), true);
//! if let Some(commit) = info.commit() {
//!     println!("produced by {commit}");
//! }
//! ```

mod git;
mod remote;

pub use git::{GitResolver, git_commit_info, relative_script_path};
pub use remote::normalize_remote_url;

pub use lake_model::{CommitDetails, CommitInfo};
