//! Symlink-aware resolution of candidate paths.
//!
//! [`resolve`] walks a path component by component, resolving each symlink
//! the moment it is met and applying `..` only to prefixes that have already
//! been resolved. The ordering matters: `link/..` must be interpreted against
//! the link's *target*, not lexically popped before the link is looked at —
//! the latter is exactly the shortcut that lets symlink escapes through.
//!
//! Components below the nearest existing ancestor are appended logically, so
//! a path that does not (yet) exist still resolves to the location it would
//! occupy. That lets the caller distinguish "escapes the root" from "merely
//! absent" for targets that are not on disk at all.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolves `path` against the real filesystem.
///
/// Symlinks are resolved in encounter order via [`fs::canonicalize`]; `.` is
/// dropped; `..` pops the already-resolved prefix (and clamps at the
/// filesystem root, as the OS would). Nothing is created or modified.
///
/// The result is absolute and free of symbolic indirection down to the
/// deepest existing ancestor; any missing tail is carried verbatim. Errors
/// surface only for I/O failures other than absence — a missing component is
/// not an error here, it simply stops symlink resolution for the remainder
/// of the walk.
pub(crate) fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    // Number of trailing components known to be absent from disk.
    let mut missing_depth: usize = 0;

    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => resolved.push(prefix.as_os_str()),
            Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `resolved` is symlink-free up to its missing tail, so a
                // lexical pop matches what the OS would resolve. pop() is a
                // no-op at the filesystem root, which clamps excess parents.
                if resolved.pop() {
                    missing_depth = missing_depth.saturating_sub(1);
                }
            }
            Component::Normal(name) => {
                if missing_depth > 0 {
                    resolved.push(name);
                    missing_depth += 1;
                    continue;
                }
                let next = resolved.join(name);
                match fs::symlink_metadata(&next) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        match fs::canonicalize(&next) {
                            Ok(target) => resolved = target,
                            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                                // Dangling link: keep it as a missing component.
                                resolved = next;
                                missing_depth = 1;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Ok(_) => resolved = next,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        resolved = next;
                        missing_depth = 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(resolved)
}
