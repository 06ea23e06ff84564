//! Single-pass percent-decoding of raw request paths.
//!
//! The decoder runs before any path interpretation. It validates every `%`
//! sequence, refuses anything that would introduce a NUL, and decodes exactly
//! once — a decoded `%25` is a literal `%` and is never re-examined. That
//! single property is what defeats double-encoding: `%252F` decodes to the
//! two-character string `%2F`, not to `/`, so a traversal hidden behind a
//! second encoding round never materializes.
//!
//! No separator semantics are applied here. Unicode characters that merely
//! resemble a slash pass through untouched; interpreting separators is the
//! normalizer's job ([`crate::segment`]).

use crate::error::DecodeError;
use percent_encoding::percent_decode_str;

/// A request path after exactly one round of percent-decoding.
///
/// Guaranteed free of NUL code points. Immutable once produced; consumed by
/// [`normalize`](crate::normalize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPath(String);

impl DecodedPath {
    /// Returns the decoded path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the decoded path, returning the inner string.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for DecodedPath {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DecodedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Percent-decodes a raw request path, exactly once.
///
/// Scans left to right and rejects the first anomaly it meets:
///
/// - `%00` → [`DecodeError::NullByte`]
/// - `%` not followed by two hex digits → [`DecodeError::MalformedEncoding`]
///
/// then decodes the validated input and rejects decoded output that is not
/// valid UTF-8 or that carries a literal NUL.
///
/// ```rust
/// use confined_path::decode;
///
/// assert_eq!(decode("/a%2Fb").unwrap().as_str(), "/a/b");
/// // One decode only: the inner encoding survives as literal text.
/// assert_eq!(decode("%252F").unwrap().as_str(), "%2F");
/// assert!(decode("/index%00.html").is_err());
/// ```
pub fn decode(raw: &str) -> Result<DecodedPath, DecodeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err(DecodeError::malformed(raw, i));
            }
            let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
            if !hi.is_ascii_hexdigit() || !lo.is_ascii_hexdigit() {
                return Err(DecodeError::malformed(raw, i));
            }
            if hi == b'0' && lo == b'0' {
                return Err(DecodeError::null_byte(raw, i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| DecodeError::malformed(raw, e.valid_up_to()))?;

    // A literal NUL in the raw input survives decoding; catch it here.
    if let Some(offset) = decoded.find('\0') {
        return Err(DecodeError::null_byte(raw, offset));
    }

    Ok(DecodedPath(decoded.into_owned()))
}
