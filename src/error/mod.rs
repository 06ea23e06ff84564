//! Error types for the decode, normalize, and confine stages.
//!
//! Each stage owns a small error enum; [`ResolveError`] unifies them so the
//! full pipeline composes with `?`. Every variant carries enough context for
//! internal diagnostics (the offending input, byte offsets, `io::Error`
//! sources) while `Display` output truncates long path data. None of this
//! detail is meant to reach a response body — the policy gate collapses all
//! failures into a [`Verdict`](crate::Verdict) before anything is sent.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

const MAX_ERROR_PATH_LEN: usize = 256;

// Internal helper: render error-friendly display of untrusted input
// (truncate long values).
pub(crate) fn truncate_display(value: &str, max_len: usize) -> String {
    let char_count = value.chars().count();
    if char_count <= max_len {
        return value.to_owned();
    }
    let keep = max_len.saturating_sub(5) / 2;
    let start: String = value.chars().take(keep).collect();
    let mut tail_chars: Vec<char> = value.chars().rev().take(keep).collect();
    tail_chars.reverse();
    let end: String = tail_chars.into_iter().collect();
    format!("{start}...{end}")
}

/// Errors produced while percent-decoding a raw request path.
///
/// Decoding is performed exactly once; both variants mean the raw input can
/// never be turned into a usable path and the request should be treated as
/// "not present" by the serving layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%00` sequence, or a literal NUL, would end up in the decoded path.
    NullByte {
        /// The raw request path as received.
        raw: String,
        /// Byte offset of the offending sequence.
        offset: usize,
    },
    /// A `%` was not followed by two hexadecimal digits, or decoding
    /// produced bytes that are not valid UTF-8.
    MalformedEncoding {
        /// The raw request path as received.
        raw: String,
        /// Byte offset of the offending sequence.
        offset: usize,
    },
}

impl DecodeError {
    // Internal helper: construct `NullByte`.
    #[inline]
    pub(crate) fn null_byte(raw: &str, offset: usize) -> Self {
        Self::NullByte {
            raw: raw.to_owned(),
            offset,
        }
    }

    // Internal helper: construct `MalformedEncoding`.
    #[inline]
    pub(crate) fn malformed(raw: &str, offset: usize) -> Self {
        Self::MalformedEncoding {
            raw: raw.to_owned(),
            offset,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NullByte { raw, offset } => {
                let truncated = truncate_display(raw, MAX_ERROR_PATH_LEN);
                write!(f, "Null byte at offset {offset} in request path '{truncated}'")
            }
            DecodeError::MalformedEncoding { raw, offset } => {
                let truncated = truncate_display(raw, MAX_ERROR_PATH_LEN);
                write!(
                    f,
                    "Malformed percent-encoding at offset {offset} in request path '{truncated}'"
                )
            }
        }
    }
}

impl Error for DecodeError {}

/// Errors produced while splitting a decoded path into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A segment contains a character the host filesystem treats as a path
    /// separator other than the ASCII `/` the path was split on.
    ///
    /// Letting such a character through as a literal file name would hand
    /// separator semantics to the OS behind the normalizer's back, so the
    /// request is rejected instead.
    IllegalSeparator {
        /// The segment carrying the separator.
        segment: String,
        /// The separator character itself.
        separator: char,
    },
}

impl NormalizeError {
    // Internal helper: construct `IllegalSeparator`.
    #[inline]
    pub(crate) fn illegal_separator(segment: &str, separator: char) -> Self {
        Self::IllegalSeparator {
            segment: segment.to_owned(),
            separator,
        }
    }
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::IllegalSeparator { segment, separator } => {
                let truncated = truncate_display(segment, MAX_ERROR_PATH_LEN);
                write!(
                    f,
                    "Illegal separator U+{:04X} in path segment '{truncated}'",
                    *separator as u32
                )
            }
        }
    }
}

impl Error for NormalizeError {}

/// Errors produced by confine-root construction and the confinement check.
#[derive(Debug)]
pub enum ConfineError {
    /// The confine root directory is missing, not a directory, or failed
    /// I/O checks during construction.
    InvalidRoot {
        /// The attempted root path.
        root: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// The candidate path (or its resolution) does not exist on disk.
    NotFound {
        /// The candidate whose resolution failed.
        path: PathBuf,
        /// Underlying I/O cause.
        source: io::Error,
    },
    /// The fully resolved path is neither the confine root nor a
    /// path-component descendant of it.
    Escaped {
        /// The resolved candidate.
        attempted_path: PathBuf,
        /// The canonical confine root.
        confine_root: PathBuf,
    },
}

impl ConfineError {
    // Internal helper: construct `InvalidRoot`.
    #[inline]
    pub(crate) fn invalid_root(root: PathBuf, source: io::Error) -> Self {
        Self::InvalidRoot { root, source }
    }

    // Internal helper: construct `NotFound`.
    #[inline]
    pub(crate) fn not_found(path: PathBuf, source: io::Error) -> Self {
        Self::NotFound { path, source }
    }

    // Internal helper: construct `Escaped`.
    #[inline]
    pub(crate) fn escaped(attempted_path: PathBuf, confine_root: PathBuf) -> Self {
        Self::Escaped {
            attempted_path,
            confine_root,
        }
    }
}

impl fmt::Display for ConfineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfineError::InvalidRoot { root, .. } => {
                write!(f, "Invalid confine root directory: {}", root.display())
            }
            ConfineError::NotFound { path, .. } => {
                let truncated = truncate_display(&path.to_string_lossy(), MAX_ERROR_PATH_LEN);
                write!(f, "Cannot resolve path: {truncated}")
            }
            ConfineError::Escaped {
                attempted_path,
                confine_root,
            } => {
                let truncated_attempted =
                    truncate_display(&attempted_path.to_string_lossy(), MAX_ERROR_PATH_LEN);
                let truncated_root =
                    truncate_display(&confine_root.to_string_lossy(), MAX_ERROR_PATH_LEN);
                write!(
                    f,
                    "Path '{truncated_attempted}' escapes confine root '{truncated_root}'"
                )
            }
        }
    }
}

impl Error for ConfineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfineError::InvalidRoot { source, .. } | ConfineError::NotFound { source, .. } => {
                Some(source)
            }
            ConfineError::Escaped { .. } => None,
        }
    }
}

/// Any failure along the decode → normalize → confine pipeline.
///
/// This is the error type of the fallible resolution API
/// ([`ConfineRoot::try_resolve_request`](crate::ConfineRoot::try_resolve_request));
/// the verdict-returning API maps it onto
/// [`Verdict::NotFound`](crate::Verdict::NotFound) /
/// [`Verdict::Forbidden`](crate::Verdict::Forbidden) and discards the detail.
#[derive(Debug)]
pub enum ResolveError {
    /// Percent-decoding failed.
    Decode(DecodeError),
    /// Segment normalization failed.
    Normalize(NormalizeError),
    /// Real-path resolution or the confinement check failed.
    Confine(ConfineError),
}

impl From<DecodeError> for ResolveError {
    #[inline]
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<NormalizeError> for ResolveError {
    #[inline]
    fn from(err: NormalizeError) -> Self {
        Self::Normalize(err)
    }
}

impl From<ConfineError> for ResolveError {
    #[inline]
    fn from(err: ConfineError) -> Self {
        Self::Confine(err)
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Decode(err) => err.fmt(f),
            ResolveError::Normalize(err) => err.fmt(f),
            ResolveError::Confine(err) => err.fmt(f),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveError::Decode(err) => Some(err),
            ResolveError::Normalize(err) => Some(err),
            ResolveError::Confine(err) => Some(err),
        }
    }
}
