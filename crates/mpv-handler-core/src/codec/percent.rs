//! Percent-decoding for URL query components.
//!
//! Browsers hand the handler links such as
//! `mpv://https%3A%2F%2Fexample.com%2Fvideo.mp4`.  The part after the scheme
//! is decoded with query-component rules: `%XX` becomes the byte `0xXX` and
//! `+` becomes a space.  Decoding is strict: a `%` that is not followed by
//! two hex digits is an error rather than being passed through.

use thiserror::Error;

/// Error type for percent-decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%` not followed by two hexadecimal digits.
    #[error("invalid URL escape {sequence:?} at byte {position}")]
    InvalidEscape { position: usize, sequence: String },

    /// The decoded byte sequence is not UTF-8.
    #[error("decoded URL is not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes a query-component string (`%XX` escapes and `+` as space).
///
/// Each escape is decoded exactly once, so `%2541` yields `%41`.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidEscape`] for a malformed escape and
/// [`DecodeError::InvalidUtf8`] when the decoded bytes are not UTF-8.
///
/// # Examples
///
/// ```rust
/// use mpv_handler_core::query_unescape;
///
/// assert_eq!(
///     query_unescape("https%3A%2F%2Fexample.com%2Fa+b.mp4").unwrap(),
///     "https://example.com/a b.mp4"
/// );
/// assert!(query_unescape("100%").is_err());
/// ```
pub fn query_unescape(input: &str) -> Result<String, DecodeError> {
    unescape(input, true)
}

/// Decodes a URL path component: `%XX` escapes only, `+` stays literal.
///
/// # Errors
///
/// Same as [`query_unescape`].
pub fn path_unescape(input: &str) -> Result<String, DecodeError> {
    unescape(input, false)
}

fn unescape(input: &str, plus_is_space: bool) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).copied().and_then(hex_value);
                let lo = bytes.get(i + 2).copied().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        let end = (i + 3).min(bytes.len());
                        return Err(DecodeError::InvalidEscape {
                            position: i,
                            sequence: String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                        });
                    }
                }
            }
            b'+' if plus_is_space => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| DecodeError::InvalidUtf8)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
