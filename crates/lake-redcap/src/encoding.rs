//! Legacy 8-bit to UTF-8 transcoding of export payloads.

use encoding_rs::{Encoding, WINDOWS_1252_INIT};

use crate::error::{RedcapError, Result};

/// Encoding assumed for payloads written with `decode = true`.
///
/// This is the WHATWG mapping for the `latin1` / `ISO-8859-1` labels.
pub static LEGACY_ENCODING: &Encoding = &WINDOWS_1252_INIT;

/// Transcodes `bytes` from [`LEGACY_ENCODING`] to UTF-8.
///
/// Every byte value has a mapping in Windows-1252 (0x81, 0x8D, 0x8F, 0x90 and
/// 0x9D decode to C1 controls), so this does not fail for the current
/// [`LEGACY_ENCODING`]. [`RedcapError::Encoding`] is only reachable if the
/// encoding is changed to one with unmapped bytes.
pub fn transcode_legacy(bytes: &[u8]) -> Result<String> {
    LEGACY_ENCODING
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(std::borrow::Cow::into_owned)
        .ok_or(RedcapError::Encoding {
            encoding: LEGACY_ENCODING.name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_unchanged() {
        assert_eq!(transcode_legacy(b"record,age\n1,42\n").unwrap(), "record,age\n1,42\n");
    }

    #[test]
    fn test_latin1_bytes_become_utf8() {
        let text = transcode_legacy(b"caf\xe9,M\xfcller,\x80").unwrap();
        assert_eq!(text, "café,Müller,€");
    }

    #[test]
    fn test_every_byte_decodes() {
        let all: Vec<u8> = (0u8..=0xFF).collect();
        let text = transcode_legacy(&all).unwrap();
        assert_eq!(text.chars().count(), 256);
        assert!(!text.contains('\u{FFFD}'));
        assert!(text.contains('\u{81}'));
        assert!(text.contains('\u{9D}'));
    }

    #[test]
    fn test_round_trip_through_legacy_encoding() {
        let original: Vec<u8> = (0x20u8..=0x7E).chain(0xA0..=0xFF).collect();
        let text = transcode_legacy(&original).unwrap();
        let (encoded, _, had_errors) = LEGACY_ENCODING.encode(&text);
        assert!(!had_errors);
        assert_eq!(encoded.as_ref(), original.as_slice());
    }
}
