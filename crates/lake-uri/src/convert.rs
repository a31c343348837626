//! Path ⇄ URI conversion under an explicit platform mode.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, UriError};
use crate::mode::PlatformMode;
use crate::uri::FileUri;

/// Prefix of Windows extended-length paths (`\\?\C:\...`).
const VERBATIM_PREFIX: &str = r"\\?\";

/// Prefix of Windows extended-length UNC paths (`\\?\UNC\server\share`).
const VERBATIM_UNC_PREFIX: &str = r"\\?\UNC\";

/// Converts an absolute path to its canonical `file://` URI.
///
/// Relative paths are rejected with [`UriError::NotAbsolute`]; resolve them
/// against the caller's working directory first.
pub fn to_uri(path: &str, mode: PlatformMode) -> Result<String> {
    let uri = match mode {
        PlatformMode::Posix => posix_to_file_uri(path)?,
        PlatformMode::Windows => windows_to_file_uri(path)?,
    };
    Ok(uri.to_string())
}

/// Converts a `file://` URI back to a local path.
///
/// Under [`PlatformMode::Windows`] any host becomes a UNC path, except
/// `localhost` in front of a drive, and a `/X:` drive prefix loses its
/// leading slash. Under [`PlatformMode::Posix`]
/// the host is ignored and the decoded path is returned as is.
pub fn to_path(uri: &str, mode: PlatformMode) -> Result<String> {
    let parsed = FileUri::parse(uri)?;
    match mode {
        PlatformMode::Posix => {
            if !parsed.is_local() {
                debug!(uri, host = ?parsed.host(), "Ignoring URI host in posix mode");
            }
            Ok(parsed.path().to_string())
        }
        PlatformMode::Windows => Ok(file_uri_to_windows(&parsed)),
    }
}

/// Converts a path on this machine to a URI, resolving relative paths
/// against the current working directory and using the host's mode.
pub fn local_path_to_uri(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path).map_err(|_| UriError::NotAbsolute {
        path: path.display().to_string(),
    })?;
    let text = absolute.to_str().ok_or_else(|| UriError::NonUtf8Path {
        path: absolute.display().to_string(),
    })?;
    to_uri(text, PlatformMode::host())
}

fn posix_to_file_uri(path: &str) -> Result<FileUri> {
    if !path.starts_with('/') {
        return Err(UriError::NotAbsolute {
            path: path.to_string(),
        });
    }
    Ok(FileUri::local(path))
}

fn windows_to_file_uri(path: &str) -> Result<FileUri> {
    let not_absolute = || UriError::NotAbsolute {
        path: path.to_string(),
    };

    let unprefixed = if let Some(unc) = path.strip_prefix(VERBATIM_UNC_PREFIX) {
        format!(r"\\{unc}")
    } else if let Some(rest) = path.strip_prefix(VERBATIM_PREFIX) {
        rest.to_string()
    } else {
        path.to_string()
    };
    let forward = unprefixed.replace('\\', "/");

    if let Some(unc) = forward.strip_prefix("//") {
        let (server, share_path) = unc.split_once('/').ok_or_else(not_absolute)?;
        let share = share_path.split('/').next().unwrap_or_default();
        if server.is_empty() || share.is_empty() {
            return Err(not_absolute());
        }
        return Ok(FileUri::with_host(server, format!("/{share_path}")));
    }

    if has_drive_prefix(&forward) && forward[2..].starts_with('/') {
        return Ok(FileUri::local(format!("/{forward}")));
    }

    Err(not_absolute())
}

fn file_uri_to_windows(uri: &FileUri) -> String {
    let path = uri.path();
    let drive_path = path.strip_prefix('/').filter(|rest| has_drive_prefix(rest));

    // `localhost` only names this machine when a drive follows; otherwise it
    // is a UNC server like any other.
    if let Some(host) = uri.host() {
        let local_drive = host.eq_ignore_ascii_case("localhost") && drive_path.is_some();
        if !local_drive {
            return format!(r"\\{host}{}", path.replace('/', "\\"));
        }
    }

    drive_path.unwrap_or(path).replace('/', "\\")
}

/// True when `s` starts with a drive designator such as `C:`.
fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/' || bytes[2] == b'\\')
}
