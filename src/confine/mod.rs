//! Confine roots, candidate construction, and the confinement check.
//!
//! A [`ConfineRoot`] is the directory a route is allowed to serve from,
//! validated and canonicalized eagerly so every later comparison runs against
//! a symlink-free path. Candidates are built by pure joins
//! ([`ConfineRoot::candidate_join`]) and only touch the filesystem inside
//! [`ConfineRoot::confined_join`] / [`ConfineRoot::unconfined_join`], which
//! resolve the real path and enforce (or deliberately skip) containment.

mod path_history;
mod realpath;

#[cfg(test)]
mod tests;

use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConfineError;
use crate::gate::ResolvedRealPath;
use crate::segment::Segment;
use path_history::{Exists, PathHistory, Raw, Resolved};

/// The directory subtree a route may serve from.
///
/// Construction canonicalizes the directory and verifies it exists; the
/// stored root is symlink-free, immutable, and cheap to clone (the inner
/// path is shared), so one value can back every request against a route.
///
/// The `Marker` type parameter is a zero-cost label for distinguishing
/// roots in the type system (e.g. `ConfineRoot<PublicAssets>` vs.
/// `ConfineRoot<UserUploads>`); it defaults to `()`.
pub struct ConfineRoot<Marker = ()> {
    root: Arc<PathHistory<((Raw, Resolved), Exists)>>,
    _marker: PhantomData<Marker>,
}

impl<Marker> Clone for ConfineRoot<Marker> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Marker> ConfineRoot<Marker> {
    /// Creates a confine root anchored at an existing directory.
    ///
    /// The path is resolved against the real filesystem (following any
    /// symlinks in it) and must exist and be a directory; anything else is
    /// [`ConfineError::InvalidRoot`]. Resolving eagerly here is what makes
    /// the later containment checks meaningful — both sides of every
    /// comparison are canonical.
    pub fn try_new<P: AsRef<Path>>(root_path: P) -> Result<Self, ConfineError> {
        let root_path = root_path.as_ref();

        let resolved = PathHistory::new(root_path)
            .resolve_real()
            .map_err(|e| ConfineError::invalid_root(root_path.to_path_buf(), e))?;

        let verified = match resolved.verify_exists() {
            Some(path) => path,
            None => {
                let io = io::Error::new(
                    io::ErrorKind::NotFound,
                    "the confine root directory does not exist",
                );
                return Err(ConfineError::invalid_root(root_path.to_path_buf(), io));
            }
        };

        if !verified.is_dir() {
            let io = io::Error::new(
                io::ErrorKind::InvalidInput,
                "the confine root exists but is not a directory",
            );
            return Err(ConfineError::invalid_root(root_path.to_path_buf(), io));
        }

        Ok(Self {
            root: Arc::new(verified),
            _marker: PhantomData,
        })
    }

    /// Joins normalized segments onto the root, producing a candidate.
    ///
    /// Pure path construction: order-preserving, no filesystem access, and
    /// no collapsing of `..` — that happens against the real filesystem in
    /// [`confined_join`](Self::confined_join).
    pub fn candidate_join(&self, segments: &[Segment]) -> CandidatePath {
        let mut inner = self.path().to_path_buf();
        for segment in segments {
            match segment {
                Segment::Parent => inner.push(".."),
                Segment::Name(name) => inner.push(name),
                // Normalization drops these; tolerate them anyway.
                Segment::Current => {}
            }
        }
        CandidatePath { inner }
    }

    /// Resolves a candidate and proves it stays inside this root.
    ///
    /// The escape check runs before the existence check on purpose: a
    /// traversal that lands outside the root is reported as
    /// [`ConfineError::Escaped`] even when its target is absent, because the
    /// request structure already disclosed the attempt.
    pub fn confined_join(
        &self,
        candidate: CandidatePath,
    ) -> Result<ResolvedRealPath<Marker>, ConfineError> {
        let attempted = candidate.into_inner();

        let resolved = PathHistory::new(attempted.clone())
            .resolve_real()
            .map_err(|e| ConfineError::not_found(attempted.clone(), e))?;

        let confined = resolved.confine_check(self.path())?;

        match confined.verify_exists() {
            Some(existing) => Ok(ResolvedRealPath::new(existing.into_inner())),
            None => Err(ConfineError::not_found(
                attempted,
                io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            )),
        }
    }

    /// Resolves a candidate without the containment check.
    ///
    /// Per-route confinement opt-out: any resolvable, existing path is
    /// accepted, which supports serving a single file outside the tree.
    pub fn unconfined_join(
        &self,
        candidate: CandidatePath,
    ) -> Result<ResolvedRealPath<Marker>, ConfineError> {
        let attempted = candidate.into_inner();

        let resolved = PathHistory::new(attempted.clone())
            .resolve_real()
            .map_err(|e| ConfineError::not_found(attempted.clone(), e))?;

        match resolved.verify_exists() {
            Some(existing) => Ok(ResolvedRealPath::new(existing.into_inner())),
            None => Err(ConfineError::not_found(
                attempted,
                io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            )),
        }
    }

    /// Returns the canonicalized confine root directory.
    #[inline]
    pub(crate) fn path(&self) -> &Path {
        self.root.as_ref()
    }

    /// Returns true if the confine root directory still exists.
    ///
    /// Always true at construction; queried live for robustness.
    #[inline]
    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    /// Returns the root directory as `&OsStr` for third-party
    /// `AsRef<Path>` interop without allocation.
    #[inline]
    pub fn interop_path(&self) -> &std::ffi::OsStr {
        self.root.as_os_str()
    }

    /// Returns a `Display` wrapper showing the canonical root directory.
    #[inline]
    pub fn display(&self) -> std::path::Display<'_> {
        self.path().display()
    }

    /// Returns filesystem metadata for the root directory.
    #[inline]
    pub fn metadata(&self) -> io::Result<std::fs::Metadata> {
        std::fs::metadata(self.path())
    }
}

impl<Marker> AsRef<Path> for ConfineRoot<Marker> {
    #[inline]
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

impl<Marker> Eq for ConfineRoot<Marker> {}

impl<M1, M2> PartialEq<ConfineRoot<M2>> for ConfineRoot<M1> {
    #[inline]
    fn eq(&self, other: &ConfineRoot<M2>) -> bool {
        self.path() == other.path()
    }
}

impl<Marker> PartialEq<Path> for ConfineRoot<Marker> {
    #[inline]
    fn eq(&self, other: &Path) -> bool {
        self.path() == other
    }
}

impl<Marker> std::fmt::Debug for ConfineRoot<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfineRoot")
            .field("root", &self.root.as_ref())
            .field("marker", &std::any::type_name::<Marker>())
            .finish()
    }
}

/// A root-joined path that has not yet touched the filesystem.
///
/// May contain uncollapsed `..` components and may not exist on disk;
/// only [`ConfineRoot::confined_join`] / [`ConfineRoot::unconfined_join`]
/// turn it into something trustworthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    inner: PathBuf,
}

impl CandidatePath {
    /// Builds a candidate from an explicit, configuration-supplied target.
    ///
    /// Absolute targets are taken as-is; relative targets are joined onto
    /// the root. Explicit targets come from route configuration rather than
    /// the transport, so no percent-decoding is involved.
    pub(crate) fn from_target(root: &Path, target: &Path) -> Self {
        let inner = if target.is_absolute() {
            target.to_path_buf()
        } else {
            root.join(target)
        };
        CandidatePath { inner }
    }

    /// Returns the candidate as a path.
    #[inline]
    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    #[inline]
    fn into_inner(self) -> PathBuf {
        self.inner
    }
}
