//! Streaming SHA-256 over files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use lake_model::{DigestAlgorithm, FileDigest};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{DigestError, Result};

/// Buffer size for reading files during digest computation.
pub const BUFFER_SIZE: usize = 65536; // 64 KB

/// Computes the lowercase hex SHA-256 of everything `reader` yields.
pub fn digest_reader<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Computes the SHA-256 of a file's full content as lowercase hex.
pub fn digest_hex(path: &Path) -> Result<String> {
    debug!("Computing SHA256 for: {}", path.display());

    let to_error = |source| DigestError::FileSystem {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_error)?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let hex_hash = digest_reader(reader).map_err(to_error)?;

    debug!("SHA256: {}", hex_hash);
    Ok(hex_hash)
}

/// Computes the digest of a file together with its algorithm and subject.
pub fn digest_file(path: &Path) -> Result<FileDigest> {
    Ok(FileDigest {
        algorithm: DigestAlgorithm::Sha256,
        hex: digest_hex(path)?,
        subject: path.to_path_buf(),
    })
}

/// Checks a file against an expected hex digest.
///
/// The comparison ignores case, surrounding whitespace and a `sha256:`
/// prefix. A mismatch returns `Ok(false)`; only an unreadable file is an error.
pub fn verify(path: &Path, expected_hex: &str) -> Result<bool> {
    let actual = digest_hex(path)?;
    let expected = expected_hex.trim();
    let expected = expected
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("sha256:"))
        .map_or(expected, |_| &expected[7..]);

    let matches = actual.eq_ignore_ascii_case(expected);
    if matches {
        info!(path = %path.display(), "Checksum verification successful");
    } else {
        warn!(
            path = %path.display(),
            expected = %expected,
            actual = %actual,
            "Checksum mismatch"
        );
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_SHA256: &str = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_digest_known_content() {
        let file = write_temp(b"Hello, World!");
        assert_eq!(digest_hex(file.path()).unwrap(), HELLO_SHA256);
    }

    #[test]
    fn test_digest_empty_file() {
        let file = write_temp(b"");
        assert_eq!(
            digest_hex(file.path()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_file_wraps_subject() {
        let file = write_temp(b"Hello, World!");
        let digest = digest_file(file.path()).unwrap();
        assert_eq!(digest.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(digest.hex, HELLO_SHA256);
        assert_eq!(digest.subject, file.path());
    }

    #[test]
    fn test_verify_accepts_case_and_prefix_variants() {
        let file = write_temp(b"Hello, World!");
        assert!(verify(file.path(), HELLO_SHA256).unwrap());
        assert!(verify(file.path(), &HELLO_SHA256.to_uppercase()).unwrap());
        assert!(verify(file.path(), &format!("  sha256:{HELLO_SHA256}\n")).unwrap());
        assert!(verify(file.path(), &format!("SHA256:{HELLO_SHA256}")).unwrap());
    }

    #[test]
    fn test_verify_mismatch_is_false() {
        let file = write_temp(b"Hello, World!");
        assert!(!verify(file.path(), "wrong_hash").unwrap());
        assert!(!verify(file.path(), "").unwrap());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            digest_hex(&missing),
            Err(DigestError::FileSystem { path, .. }) if path == missing
        ));
        assert!(verify(&missing, HELLO_SHA256).is_err());
    }

    #[test]
    fn test_digest_spans_multiple_buffers() {
        let contents = vec![0xABu8; BUFFER_SIZE * 3 + 17];
        let file = write_temp(&contents);
        let streamed = digest_hex(file.path()).unwrap();
        let whole = hex::encode(Sha256::digest(&contents));
        assert_eq!(streamed, whole);
    }
}
