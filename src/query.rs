//! Segment URIs name the files they keep as the keys of a `key=value&...`
//! string. Decoding is strict: a bad escape or a `;` separator anywhere in the
//! URI rejects the whole URI.

use std::ffi::OsString;

use percent_encoding::percent_decode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid semicolon separator in query")]
    Semicolon,
    #[error("invalid URL escape {0:?}")]
    BadEscape(String),
}

/// Decoded keys of `raw`, in first-seen order and without duplicates.
/// Keys are raw bytes, so `%ff` names a non-UTF-8 file.
pub fn query_keys(raw: &str) -> Result<Vec<OsString>, QueryError> {
    let mut keys: Vec<OsString> = Vec::new();
    let mut first_error = None;

    for pair in raw.split('&') {
        if pair.contains(';') {
            first_error.get_or_insert(QueryError::Semicolon);
            continue;
        }
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if let Err(err) = check_escapes(key).and_then(|_| check_escapes(value)) {
            first_error.get_or_insert(err);
            continue;
        }
        let key = decode(key);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(keys),
    }
}

fn check_escapes(s: &str) -> Result<(), QueryError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                let escape = String::from_utf8_lossy(&bytes[i..end]).into_owned();
                return Err(QueryError::BadEscape(escape));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn decode(key: &str) -> OsString {
    let plus_as_space: Vec<u8> = key
        .bytes()
        .map(|b| if b == b'+' { b' ' } else { b })
        .collect();
    bytes_to_os_string(percent_decode(&plus_as_space).collect())
}

#[cfg(unix)]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}
