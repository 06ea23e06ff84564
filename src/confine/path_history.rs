//! Typestate pipeline for candidate paths.
//!
//! Each validation step consumes the previous state and produces the next,
//! so a path cannot reach the confined state without having passed through
//! real-path resolution and the boundary check in that order.

use std::io;
use std::marker::PhantomData;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use super::realpath;
use crate::error::ConfineError;

#[derive(Debug, Clone)]
pub(crate) struct Raw;
#[derive(Debug, Clone)]
pub(crate) struct Resolved;
#[derive(Debug, Clone)]
pub(crate) struct Exists;
#[derive(Debug, Clone)]
pub(crate) struct Confined;

/// A path together with the validation states it has passed through.
#[derive(Debug, Clone)]
pub(crate) struct PathHistory<State> {
    inner: PathBuf,
    _marker: PhantomData<State>,
}

impl<S> AsRef<Path> for PathHistory<S> {
    #[inline]
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

impl<S> Deref for PathHistory<S> {
    type Target = Path;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PathHistory<Raw> {
    #[inline]
    pub(crate) fn new<P: Into<PathBuf>>(path: P) -> Self {
        PathHistory {
            inner: path.into(),
            _marker: PhantomData,
        }
    }
}

impl<S> PathHistory<S> {
    #[inline]
    pub(crate) fn into_inner(self) -> PathBuf {
        self.inner
    }

    /// Resolves symlinks and `..` against the real filesystem.
    ///
    /// The error mapping differs by call site (root construction vs.
    /// candidate resolution), so the raw `io::Error` is surfaced here.
    pub(crate) fn resolve_real(self) -> io::Result<PathHistory<(S, Resolved)>> {
        let resolved = realpath::resolve(&self.inner)?;
        Ok(PathHistory {
            inner: resolved,
            _marker: PhantomData,
        })
    }

    pub(crate) fn verify_exists(self) -> Option<PathHistory<(S, Exists)>> {
        self.inner.exists().then_some(PathHistory {
            inner: self.inner,
            _marker: PhantomData,
        })
    }
}

impl<S> PathHistory<(S, Resolved)> {
    /// Component-wise containment check against the canonical confine root.
    ///
    /// Equal-to-root passes; a string prefix that is not a component prefix
    /// (`/root-evil` against `/root`) does not.
    #[inline]
    pub(crate) fn confine_check(
        self,
        root: &Path,
    ) -> Result<PathHistory<((S, Resolved), Confined)>, ConfineError> {
        if !self.inner.starts_with(root) {
            return Err(ConfineError::escaped(self.into_inner(), root.to_path_buf()));
        }
        Ok(PathHistory {
            inner: self.inner,
            _marker: PhantomData,
        })
    }
}
