//! Structured `file://` URIs.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::{Result, UriError};

/// Bytes escaped in the path component: everything except RFC 3986
/// unreserved characters, sub-delims, `:`, `@` and `/`.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@')
    .remove(b'/');

const SCHEME: &str = "file";

/// A `file` URI with its path held in decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUri {
    host: Option<String>,
    path: String,
}

impl FileUri {
    /// A URI on the local host. `path` is decoded and must start with `/`.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            host: None,
            path: path.into(),
        }
    }

    /// A URI naming a remote host, as produced for UNC shares.
    pub fn with_host(host: impl Into<String>, path: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            host: (!host.is_empty()).then_some(host),
            path: path.into(),
        }
    }

    /// Parses a `file` URI.
    ///
    /// The scheme is matched case-insensitively. Query and fragment parts are
    /// discarded. An empty authority yields no host.
    pub fn parse(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri.split_once(':').ok_or_else(|| UriError::Malformed {
            uri: uri.to_string(),
            reason: "missing scheme",
        })?;
        if !scheme.eq_ignore_ascii_case(SCHEME) {
            return Err(UriError::InvalidScheme {
                uri: uri.to_string(),
                scheme: scheme.to_string(),
            });
        }

        let rest = rest
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let (host, raw_path) = if let Some(after) = rest.strip_prefix("//") {
            match after.find('/') {
                Some(idx) => (&after[..idx], &after[idx..]),
                None => (after, "/"),
            }
        } else if rest.starts_with('/') {
            ("", rest)
        } else {
            return Err(UriError::Malformed {
                uri: uri.to_string(),
                reason: "path must be absolute",
            });
        };

        let path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| UriError::Malformed {
                uri: uri.to_string(),
                reason: "path is not valid UTF-8 after percent-decoding",
            })?
            .into_owned();

        Ok(Self::with_host(host, path))
    }

    /// Host component, if any (`localhost` included).
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Decoded path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when the URI names the local machine (no host or `localhost`).
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.host
            .as_deref()
            .is_none_or(|h| h.eq_ignore_ascii_case("localhost"))
    }
}

impl fmt::Display for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME}://{}{}",
            self.host.as_deref().unwrap_or_default(),
            utf8_percent_encode(&self.path, PATH_ENCODE_SET)
        )
    }
}
