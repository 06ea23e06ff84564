//! # confined-path
//!
//! Decide whether a request-supplied path may be served from a designated
//! directory, and survive adversarial encodings while doing it.
//!
//! This crate is the security-critical core of a static-file-serving feature:
//! given a raw request path and a [`ConfineRoot`], it percent-decodes the path
//! exactly once, splits it into classified segments, joins them onto the root
//! without any lexical collapsing, resolves the result against the real
//! filesystem (symlinks included), and verifies that the final path is the
//! root itself or a path-component descendant of it. The outcome is a
//! [`Verdict`] the serving layer turns into an HTTP response; routing,
//! streaming, MIME detection, and caching headers are deliberately out of
//! scope.
//!
//! ## Quick start
//!
//! ```rust
//! use confined_path::{ConfineRoot, Verdict};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! std::fs::write(dir.path().join("index.html"), "<html></html>")?;
//!
//! let root: ConfineRoot = ConfineRoot::try_new(dir.path())?;
//! match root.resolve_request("/index.html", true) {
//!     Verdict::Allow(file) => {
//!         let body = file.read()?;
//!         assert_eq!(body, b"<html></html>");
//!     }
//!     Verdict::NotFound | Verdict::Forbidden => unreachable!(),
//! }
//!
//! // Traversal resolves outside the root and is refused.
//! assert!(matches!(
//!     root.resolve_request("/../secrets.txt", true),
//!     Verdict::Forbidden
//! ));
//! # Ok(()) }
//! ```
//!
//! ## The pipeline
//!
//! Resolution is a linear state machine with no retries:
//!
//! 1. **Decode** ([`decode`]): one round of percent-decoding. `%00` and
//!    malformed sequences are rejected; `%252F` becomes the literal `%2F`,
//!    never `/`.
//! 2. **Normalize** ([`normalize`]): split on ASCII `/` only, classify each
//!    segment by exact match against `.` and `..`. Unicode slash look-alikes
//!    stay ordinary name characters; characters the host OS would treat as a
//!    separator are rejected outright.
//! 3. **Resolve** ([`ConfineRoot::candidate_join`]): a pure, order-preserving
//!    join. `..` is *not* collapsed here — a lexical collapse cannot see
//!    symlinks, which is the classic bug this design avoids.
//! 4. **Confine** ([`ConfineRoot::confined_join`]): resolve every symlink and
//!    `..` against the real filesystem, then check containment
//!    component-wise (`/root-evil` never satisfies a root of `/root`).
//!
//! The gate maps failures to verdicts deterministically: anomalies caught
//! while decoding or normalizing come back as [`Verdict::NotFound`] so a
//! probing client cannot learn that an encoding trick was recognized, while a
//! successfully decoded path that escapes the root comes back as
//! [`Verdict::Forbidden`] — the request already revealed its intent.
//!
//! ## Confinement opt-out
//!
//! Confinement is a per-call choice. Passing `confine = false` (or using
//! [`ConfineRoot::resolve_target`] with it) accepts any resolvable path,
//! which supports intentionally serving a single file outside the tree.
//!
//! ## Concurrency
//!
//! Every resolution is stateless and independent. A [`ConfineRoot`] is
//! immutable after construction and cheap to clone, so it can be shared
//! across request handlers without locking. The confinement step performs
//! filesystem reads; async callers should treat it as a blocking operation.

pub mod confine;
pub mod decode;
pub mod error;
pub mod gate;
pub mod segment;

#[cfg(feature = "serde")]
pub mod serde_ext {
    //! Serde integration for validated paths.
    //!
    //! A `ResolvedRealPath` serializes as its system path string. There is
    //! deliberately no context-free `Deserialize`: a path cannot be proven
    //! safe without a [`ConfineRoot`], so deserialization goes through a
    //! seed carrying one.
    //!
    //! ```rust
    //! use confined_path::ConfineRoot;
    //! use confined_path::serde_ext::WithConfineRoot;
    //! use serde::de::DeserializeSeed;
    //! # fn main() -> Result<(), Box<dyn std::error::Error>> {
    //! # let dir = tempfile::tempdir()?;
    //! # std::fs::write(dir.path().join("app.js"), "")?;
    //! let root: ConfineRoot = ConfineRoot::try_new(dir.path())?;
    //! let mut de = serde_json::Deserializer::from_str("\"/app.js\"");
    //! let resolved = WithConfineRoot(&root).deserialize(&mut de)?;
    //! assert!(resolved.display().to_string().ends_with("app.js"));
    //! # Ok(()) }
    //! ```

    use crate::confine::ConfineRoot;
    use crate::gate::ResolvedRealPath;
    use serde::de::DeserializeSeed;
    use serde::Deserialize;

    /// Deserialize a request path and validate it against a confine root.
    pub struct WithConfineRoot<'a, Marker>(pub &'a ConfineRoot<Marker>);

    impl<'de, Marker> DeserializeSeed<'de> for WithConfineRoot<'_, Marker> {
        type Value = ResolvedRealPath<Marker>;

        fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            self.0
                .try_resolve_request(&raw, true)
                .map_err(serde::de::Error::custom)
        }
    }
}

// Public exports
pub use confine::{CandidatePath, ConfineRoot};
pub use decode::{decode, DecodedPath};
pub use error::{ConfineError, DecodeError, NormalizeError, ResolveError};
pub use gate::{ResolvedRealPath, Verdict};
pub use segment::{normalize, Segment};

/// Result type alias for this crate's operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
