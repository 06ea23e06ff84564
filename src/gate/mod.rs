//! The policy gate: pipeline orchestration and verdict mapping.
//!
//! `resolve_request` runs DECODE → NORMALIZE → RESOLVE → CONFINE as a linear
//! state machine with no retries and collapses every failure into a
//! [`Verdict`]. The mapping is externally observable and security-relevant:
//! anomalies caught before the filesystem is consulted (null bytes, malformed
//! or double encodings, illegal separators) come back as `NotFound`, so a
//! scanner cannot confirm the trick was even recognized; only a well-formed
//! path that demonstrably resolves outside the root earns a `Forbidden`.

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::confine::{CandidatePath, ConfineRoot};
use crate::decode::decode;
use crate::error::{ConfineError, ResolveError};
use crate::segment::normalize;

#[cfg(test)]
mod tests;

/// A filesystem path proven safe to serve.
///
/// Produced only by the confiner: the wrapped path is absolute, symlink-free,
/// exists on disk, and — unless confinement was deliberately opted out of —
/// lies inside its confine root. If a value of this type exists, the
/// containment decision has already been made.
pub struct ResolvedRealPath<Marker = ()> {
    inner: PathBuf,
    _marker: PhantomData<Marker>,
}

impl<Marker> ResolvedRealPath<Marker> {
    #[inline]
    pub(crate) fn new(inner: PathBuf) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Returns the resolved path as `&OsStr` for third-party
    /// `AsRef<Path>` interop without allocation.
    #[inline]
    pub fn interop_path(&self) -> &std::ffi::OsStr {
        self.inner.as_os_str()
    }

    /// Consumes the value, returning the resolved path.
    #[inline]
    pub fn into_path_buf(self) -> PathBuf {
        self.inner
    }

    /// Returns a `Display` wrapper showing the resolved system path.
    #[inline]
    pub fn display(&self) -> std::path::Display<'_> {
        self.inner.display()
    }

    /// Returns filesystem metadata for the resolved path.
    #[inline]
    pub fn metadata(&self) -> io::Result<fs::Metadata> {
        fs::metadata(&self.inner)
    }

    /// Opens the resolved file for reading.
    #[inline]
    pub fn open(&self) -> io::Result<fs::File> {
        fs::File::open(&self.inner)
    }

    /// Reads the entire contents of the resolved file.
    #[inline]
    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.inner)
    }
}

impl<Marker> Clone for ResolvedRealPath<Marker> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Marker> Eq for ResolvedRealPath<Marker> {}

impl<M1, M2> PartialEq<ResolvedRealPath<M2>> for ResolvedRealPath<M1> {
    #[inline]
    fn eq(&self, other: &ResolvedRealPath<M2>) -> bool {
        self.inner == other.inner
    }
}

impl<Marker> PartialEq<Path> for ResolvedRealPath<Marker> {
    #[inline]
    fn eq(&self, other: &Path) -> bool {
        self.inner == other
    }
}

impl<Marker> PartialEq<PathBuf> for ResolvedRealPath<Marker> {
    #[inline]
    fn eq(&self, other: &PathBuf) -> bool {
        self.inner == *other
    }
}

impl<Marker> std::fmt::Debug for ResolvedRealPath<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRealPath")
            .field("path", &self.inner)
            .field("marker", &std::any::type_name::<Marker>())
            .finish()
    }
}

#[cfg(feature = "serde")]
impl<Marker> serde::Serialize for ResolvedRealPath<Marker> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.inner.display())
    }
}

/// Terminal outcome of one resolution request.
///
/// Carries no mutable state; the serving layer turns it into a response
/// (`Allow` → stream the file, `NotFound` → 404, `Forbidden` → 403).
#[derive(Debug)]
pub enum Verdict<Marker = ()> {
    /// The path decoded, normalized, resolved, and stayed inside the root
    /// (or confinement was opted out). Carries the proven path.
    Allow(ResolvedRealPath<Marker>),
    /// The resource is absent — or the request carried an encoding anomaly
    /// the gate declines to acknowledge.
    NotFound,
    /// The path is well-formed but resolves outside the confine root.
    Forbidden,
}

impl<Marker> Verdict<Marker> {
    /// Returns true for `Allow`.
    #[inline]
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow(_))
    }

    /// Consumes the verdict, returning the resolved path on `Allow`.
    #[inline]
    pub fn into_resolved(self) -> Option<ResolvedRealPath<Marker>> {
        match self {
            Verdict::Allow(resolved) => Some(resolved),
            Verdict::NotFound | Verdict::Forbidden => None,
        }
    }
}

// The externally observable error-to-verdict mapping. Every decode/normalize
// anomaly and every absent target collapses into NotFound; Forbidden is
// reserved for a successfully resolved path that failed the containment
// check. InvalidRoot cannot occur through a validated ConfineRoot and maps
// to NotFound as well.
fn verdict_from_error<Marker>(err: ResolveError) -> Verdict<Marker> {
    match err {
        ResolveError::Confine(ConfineError::Escaped { .. }) => Verdict::Forbidden,
        ResolveError::Decode(_) | ResolveError::Normalize(_) | ResolveError::Confine(_) => {
            Verdict::NotFound
        }
    }
}

impl<Marker> ConfineRoot<Marker> {
    /// Runs the full pipeline on a raw request path, returning the cause of
    /// any failure.
    ///
    /// This is the diagnostic-carrying form: the [`ResolveError`] says which
    /// stage refused the request and why. That detail is for internal
    /// consumption only — anything user-facing should go through
    /// [`resolve_request`](Self::resolve_request), which collapses it.
    pub fn try_resolve_request(
        &self,
        raw: &str,
        confine: bool,
    ) -> Result<ResolvedRealPath<Marker>, ResolveError> {
        let decoded = decode(raw)?;
        let segments = normalize(&decoded)?;
        let candidate = self.candidate_join(&segments);
        let resolved = if confine {
            self.confined_join(candidate)?
        } else {
            self.unconfined_join(candidate)?
        };
        Ok(resolved)
    }

    /// Decides whether a raw request path may be served from this root.
    ///
    /// The request path is taken as received from the transport, before any
    /// framework-level decoding; a leading `/` is interpreted relative to
    /// the confine root. With `confine` set to false the containment check
    /// is skipped and any resolvable path is allowed.
    ///
    /// ```rust
    /// use confined_path::{ConfineRoot, Verdict};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let dir = tempfile::tempdir()?;
    /// # std::fs::write(dir.path().join("app.js"), "")?;
    /// let root: ConfineRoot = ConfineRoot::try_new(dir.path())?;
    /// assert!(root.resolve_request("/app.js", true).is_allow());
    /// assert!(matches!(
    ///     root.resolve_request("/../app.js", true),
    ///     Verdict::Forbidden
    /// ));
    /// # Ok(()) }
    /// ```
    pub fn resolve_request(&self, raw: &str, confine: bool) -> Verdict<Marker> {
        match self.try_resolve_request(raw, confine) {
            Ok(resolved) => Verdict::Allow(resolved),
            Err(err) => verdict_from_error(err),
        }
    }

    /// Decides whether an explicit, configuration-supplied target may be
    /// served.
    ///
    /// Unlike [`resolve_request`](Self::resolve_request) the target is not
    /// percent-decoded — it comes from a route handler's configuration, not
    /// the transport. Absolute targets are resolved as-is; relative targets
    /// are joined onto the root. The same confinement rules and verdict
    /// mapping apply.
    pub fn resolve_target<P: AsRef<Path>>(&self, target: P, confine: bool) -> Verdict<Marker> {
        let candidate = CandidatePath::from_target(self.as_ref(), target.as_ref());
        let result = if confine {
            self.confined_join(candidate)
        } else {
            self.unconfined_join(candidate)
        };
        match result {
            Ok(resolved) => Verdict::Allow(resolved),
            Err(err) => verdict_from_error(ResolveError::Confine(err)),
        }
    }
}
