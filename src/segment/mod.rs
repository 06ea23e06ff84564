//! Splitting decoded paths into classified segments.
//!
//! The normalizer splits strictly on the ASCII `/` character. Classification
//! into current/parent/name is by exact string equality — no other character
//! sequence, encoded variant, or Unicode look-alike is ever promoted to a
//! separator or a traversal marker.
//!
//! Parent segments are deliberately *not* collapsed against the names before
//! them. A purely lexical collapse cannot see symlinks, so the decision about
//! what `..` actually reaches is deferred to the confiner, which consults the
//! real filesystem ([`crate::confine`]).

use crate::decode::DecodedPath;
use crate::error::NormalizeError;

/// One `/`-delimited unit of a decoded request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exactly `.` — dropped during normalization.
    Current,
    /// Exactly `..` — preserved verbatim for the real-path confinement check.
    Parent,
    /// Anything else, kept as an opaque name. `..%2F`, `...`, and slash
    /// look-alikes all land here.
    Name(String),
}

impl Segment {
    // Classification is by exact equality to "." and ".." only.
    fn classify(segment: &str) -> Segment {
        match segment {
            "." => Segment::Current,
            ".." => Segment::Parent,
            name => Segment::Name(name.to_owned()),
        }
    }
}

/// Splits a decoded path into an ordered sequence of segments.
///
/// - Empty segments (leading slash, doubled slashes, trailing slash) are
///   dropped.
/// - `.` segments are dropped; `..` segments are preserved, including excess
///   parents that would climb above the path's own root — the confiner makes
///   that call against the real filesystem.
/// - A character inside a segment that the host OS treats as a path
///   separator (for example `\` on Windows) is rejected with
///   [`NormalizeError::IllegalSeparator`]: accepting it as a literal name
///   character would let the OS apply separator semantics the normalizer
///   never saw. Characters that only *look* like slashes (U+2215, U+2216,
///   U+FF0F, ...) are not OS separators and remain ordinary name bytes.
///
/// ```rust
/// use confined_path::{decode, normalize, Segment};
///
/// let decoded = decode("/../app.js").unwrap();
/// assert_eq!(
///     normalize(&decoded).unwrap(),
///     vec![Segment::Parent, Segment::Name("app.js".into())],
/// );
/// ```
pub fn normalize(decoded: &DecodedPath) -> Result<Vec<Segment>, NormalizeError> {
    let mut segments = Vec::new();
    for part in decoded.as_str().split('/') {
        if part.is_empty() {
            continue;
        }
        // Parts cannot contain '/' (we just split on it), so any separator
        // found here is a host-specific one such as '\' on Windows.
        if let Some(separator) = part.chars().find(|&c| std::path::is_separator(c)) {
            return Err(NormalizeError::illegal_separator(part, separator));
        }
        match Segment::classify(part) {
            Segment::Current => {}
            segment => segments.push(segment),
        }
    }
    Ok(segments)
}
