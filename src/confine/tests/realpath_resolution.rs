use crate::confine::realpath;
use std::fs;

#[test]
fn existing_paths_match_std_canonicalize() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("a/b");
    fs::create_dir_all(&dir).unwrap();

    let resolved = realpath::resolve(&dir).unwrap();
    assert_eq!(resolved, fs::canonicalize(&dir).unwrap());
}

#[test]
fn missing_tail_is_appended_to_the_resolved_ancestor() {
    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("x/y/z.txt");

    let resolved = realpath::resolve(&target).unwrap();
    let expected = fs::canonicalize(tmp.path()).unwrap().join("x/y/z.txt");
    assert_eq!(resolved, expected);
}

#[test]
fn parent_components_pop_resolved_prefixes() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("a/b")).unwrap();

    let resolved = realpath::resolve(&tmp.path().join("a/b/../c.txt")).unwrap();
    let expected = fs::canonicalize(tmp.path()).unwrap().join("a/c.txt");
    assert_eq!(resolved, expected);
}

#[test]
fn parent_after_missing_component_backs_out_of_it() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("real.txt"), "x").unwrap();

    let resolved = realpath::resolve(&tmp.path().join("nope/../real.txt")).unwrap();
    let expected = fs::canonicalize(tmp.path()).unwrap().join("real.txt");
    assert_eq!(resolved, expected);
}

#[test]
fn current_components_are_dropped() {
    let tmp = tempfile::tempdir().unwrap();

    let resolved = realpath::resolve(&tmp.path().join("./a/./b")).unwrap();
    let expected = fs::canonicalize(tmp.path()).unwrap().join("a/b");
    assert_eq!(resolved, expected);
}

#[test]
fn excess_parents_clamp_at_the_filesystem_root() {
    let tmp = tempfile::tempdir().unwrap();
    let mut path = tmp.path().to_path_buf();
    for _ in 0..64 {
        path.push("..");
    }
    path.push("confined-path-clamp-probe");

    let resolved = realpath::resolve(&path).unwrap();
    // However deep the traversal, the result never leaves the filesystem.
    assert!(resolved.is_absolute());
    assert!(resolved.ends_with("confined-path-clamp-probe"));
    let parent = resolved.parent().unwrap();
    assert!(parent.parent().is_none(), "expected filesystem root, got {parent:?}");
}

#[cfg(unix)]
#[test]
fn symlinks_resolve_in_encounter_order() {
    use std::os::unix::fs as unix_fs;

    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("file.txt"), "ok").unwrap();
    unix_fs::symlink(&data, tmp.path().join("ln")).unwrap();

    // `ln/..` must resolve through the link target, not lexically drop `ln`.
    let resolved = realpath::resolve(&tmp.path().join("ln/../data/file.txt")).unwrap();
    let expected = fs::canonicalize(tmp.path()).unwrap().join("data/file.txt");
    assert_eq!(resolved, expected);
}

#[cfg(unix)]
#[test]
fn dangling_symlink_is_kept_as_a_missing_component() {
    use std::os::unix::fs as unix_fs;

    let tmp = tempfile::tempdir().unwrap();
    unix_fs::symlink(tmp.path().join("gone"), tmp.path().join("dangling")).unwrap();

    let resolved = realpath::resolve(&tmp.path().join("dangling")).unwrap();
    assert_eq!(
        resolved,
        fs::canonicalize(tmp.path()).unwrap().join("dangling")
    );
    assert!(!resolved.exists());
}
