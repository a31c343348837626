//! Commit metadata from the `git` executable.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use lake_model::{CommitDetails, CommitInfo};
use tracing::debug;

use crate::remote::normalize_remote_url;

/// Name of the remote whose URL is recorded.
const ORIGIN: &str = "origin";

/// Resolves commit metadata by shelling out to `git`.
#[derive(Debug, Clone)]
pub struct GitResolver {
    executable: OsString,
}

impl Default for GitResolver {
    fn default() -> Self {
        Self {
            executable: OsString::from("git"),
        }
    }
}

impl GitResolver {
    /// Resolver using `git` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific executable instead of `git` from `PATH`.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<OsString>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Collects repository URL, commit and script path for `script_path`.
    ///
    /// A relative `script_path` is taken relative to `dir`. Never fails: any
    /// unresolved step yields [`CommitInfo::absent`].
    pub fn commit_info(&self, dir: &Path, script_path: &Path, short: bool) -> CommitInfo {
        match self.resolve(dir, script_path, short) {
            Some(details) => {
                debug!(
                    repo_url = %details.repo_url,
                    commit = %details.commit,
                    script = %details.script_relpath,
                    "Resolved git provenance"
                );
                CommitInfo::resolved(details)
            }
            None => CommitInfo::absent(),
        }
    }

    fn resolve(&self, dir: &Path, script_path: &Path, short: bool) -> Option<CommitDetails> {
        let root = PathBuf::from(self.run(dir, &["rev-parse", "--show-toplevel"])?);

        let commit = if short {
            self.run(&root, &["rev-parse", "--short", "HEAD"])?
        } else {
            self.run(&root, &["rev-parse", "HEAD"])?
        };

        let remote = self.run(&root, &["remote", "get-url", ORIGIN])?;

        let script = dir.join(script_path);
        let Some(script_relpath) = relative_script_path(&root, &script) else {
            debug!(
                root = %root.display(),
                script = %script.display(),
                "Script is outside the repository"
            );
            return None;
        };

        Some(CommitDetails {
            repo_url: normalize_remote_url(&remote),
            commit,
            script_relpath,
        })
    }

    /// Runs `git -C <dir> <args>` and returns trimmed, non-empty stdout.
    fn run(&self, dir: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new(&self.executable)
            .arg("-C")
            .arg(dir)
            .args(args)
            .output();

        match output {
            Ok(output) if output.status.success() => String::from_utf8(output.stdout)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                debug!(
                    ?args,
                    dir = %dir.display(),
                    stderr = %stderr.trim(),
                    "git command failed"
                );
                None
            }
            Err(error) => {
                debug!(?args, %error, "git executable unavailable");
                None
            }
        }
    }
}

/// Collects commit metadata for `script_path` using `git` from `PATH`.
///
/// Any failure (not a repository, no `origin` remote, no `git`) returns an
/// all-absent [`CommitInfo`]; this function never errors.
pub fn git_commit_info(dir: &Path, script_path: &Path, short: bool) -> CommitInfo {
    GitResolver::new().commit_info(dir, script_path, short)
}

/// Path of `script` relative to `root`, `/`-separated.
///
/// Both paths are canonicalized when they exist so symlinked temp or home
/// directories compare equal. Returns `None` when `script` is outside `root`.
pub fn relative_script_path(root: &Path, script: &Path) -> Option<String> {
    let root = canonical_or_absolute(root)?;
    let script = canonical_or_absolute(script)?;
    let relative = script.strip_prefix(&root).ok()?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join("/"))
}

fn canonical_or_absolute(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .ok()
}
