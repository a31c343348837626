//! Path convention selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Path convention used on either side of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMode {
    /// `/`-rooted paths; URI hosts are ignored.
    Posix,
    /// Drive-letter (`C:\`) and UNC (`\\server\share`) paths.
    Windows,
}

impl PlatformMode {
    /// Mode matching the operating system this binary was built for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for PlatformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlatformMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posix" | "unix" => Ok(Self::Posix),
            "windows" | "win" => Ok(Self::Windows),
            other => Err(format!("unknown platform mode: {other}")),
        }
    }
}
