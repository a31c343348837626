//! Content addressing for lake files.
//!
//! Files are identified by the SHA-256 digest of their bytes. Digests are
//! computed by streaming the file through a fixed-size buffer, so memory use
//! does not grow with file size.
//!
//! - [`digest_hex`] - lowercase hex digest of a file
//! - [`digest_file`] - the same, wrapped in a [`lake_model::FileDigest`]
//! - [`verify`] - recompute and compare; a mismatch is `Ok(false)`, not an error

mod checksum;
mod error;

pub use checksum::{BUFFER_SIZE, digest_file, digest_hex, digest_reader, verify};
pub use error::{DigestError, Result};
