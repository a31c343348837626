//! Configuration values passed explicitly into each component.
//!
//! Nothing in the workspace reads credentials or paths from ambient state.
//! The binary assembles a [`LakeSettings`] from flags, environment and an
//! optional JSON file, then resolves it into the typed values below.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Name of the directory under the lake root that receives exports.
const INGESTS_DIR: &str = "ingests";

/// Name of the directory under the lake root that holds catalog state.
const CATALOG_DIR: &str = "catalog";

/// Connection values for a REDCap project.
#[derive(Clone, PartialEq, Eq)]
pub struct RedcapConfig {
    api_url: String,
    token: String,
}

impl RedcapConfig {
    /// Creates a config, rejecting blank URL or token.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let api_url = api_url.into();
        let token = token.into();
        if api_url.trim().is_empty() {
            return Err(ConfigError::Missing { name: "api_url" });
        }
        if token.trim().is_empty() {
            return Err(ConfigError::Missing { name: "api_token" });
        }
        Ok(Self {
            api_url: api_url.trim().to_string(),
            token: token.trim().to_string(),
        })
    }

    /// The REDCap API endpoint, e.g. `https://redcap.example.org/api/`.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The project API token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for RedcapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedcapConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Directory layout of the local data lake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LakeLayout {
    root: PathBuf,
}

impl LakeLayout {
    /// Creates a layout rooted at `root`. An empty path is a missing lake root.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(ConfigError::Missing { name: "lake_root" });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that receives REDCap exports (`<root>/ingests`).
    pub fn ingests_dir(&self) -> PathBuf {
        self.root.join(INGESTS_DIR)
    }

    /// Directory that holds the local catalog manifest (`<root>/catalog`).
    pub fn catalog_dir(&self) -> PathBuf {
        self.root.join(CATALOG_DIR)
    }
}

/// Raw, possibly incomplete settings as read from a file or the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LakeSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lake_root: Option<PathBuf>,
}

/// Settings after every required input has been checked.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub redcap: RedcapConfig,
    pub layout: LakeLayout,
}

impl LakeSettings {
    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlays `overrides` on top of `self`; values present in `overrides` win.
    #[must_use]
    pub fn merged_with(self, overrides: LakeSettings) -> Self {
        Self {
            api_url: overrides.api_url.or(self.api_url),
            api_token: overrides.api_token.or(self.api_token),
            lake_root: overrides.lake_root.or(self.lake_root),
        }
    }

    /// Returns the REDCap connection values, or the first missing input.
    pub fn redcap(&self) -> Result<RedcapConfig> {
        let api_url = self
            .api_url
            .as_deref()
            .ok_or(ConfigError::Missing { name: "api_url" })?;
        let token = self
            .api_token
            .as_deref()
            .ok_or(ConfigError::Missing { name: "api_token" })?;
        RedcapConfig::new(api_url, token)
    }

    /// Returns the lake layout, or [`ConfigError::Missing`] for `lake_root`.
    pub fn layout(&self) -> Result<LakeLayout> {
        let root = self
            .lake_root
            .clone()
            .ok_or(ConfigError::Missing { name: "lake_root" })?;
        LakeLayout::new(root)
    }

    /// Checks every required input and produces typed configuration.
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        Ok(ResolvedSettings {
            redcap: self.redcap()?,
            layout: self.layout()?,
        })
    }
}
