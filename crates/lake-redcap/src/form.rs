//! `application/x-www-form-urlencoded` bodies.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left unescaped by HTML form encoding.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Encodes key/value pairs as a form body, keeping the given order.
pub fn encode_form<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key.as_ref(), FORM_ENCODE_SET),
                utf8_percent_encode(value.as_ref(), FORM_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
