use crate::error::{ConfineError, DecodeError, ResolveError};
use crate::{ConfineRoot, Verdict};
use std::fs;

// Mirrors the canonical static-serving layout: a served directory with a
// sensitive sibling file outside it.
fn provision() -> (tempfile::TempDir, ConfineRoot) {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("directory")).unwrap();
    fs::write(tmp.path().join("directory/index.html"), "<html></html>").unwrap();
    fs::write(tmp.path().join("security.js"), "module.exports = {};").unwrap();
    let root = ConfineRoot::try_new(tmp.path().join("directory")).unwrap();
    (tmp, root)
}

#[test]
fn file_inside_the_root_is_allowed() {
    let (_tmp, root) = provision();

    let verdict = root.resolve_request("/index.html", true);
    let resolved = verdict.into_resolved().expect("should be allowed");
    assert_eq!(resolved, root.path().join("index.html"));
    assert_eq!(resolved.read().unwrap(), b"<html></html>");
}

#[test]
fn the_root_itself_is_allowed() {
    let (_tmp, root) = provision();

    let verdict = root.resolve_request("/", true);
    let resolved = verdict.into_resolved().expect("should be allowed");
    assert!(resolved.metadata().unwrap().is_dir());
}

#[test]
fn null_byte_traversal_is_not_found() {
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/%00/../security.js", true),
        Verdict::NotFound
    ));
}

#[test]
fn lexical_traversal_is_forbidden() {
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/../security.js", true),
        Verdict::Forbidden
    ));
}

#[test]
fn encoded_slash_traversal_is_forbidden() {
    // "%2F" decodes (once) to "/", so this is the same traversal as above.
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/..%2Fsecurity.js", true),
        Verdict::Forbidden
    ));
}

#[test]
fn double_encoded_slash_is_not_found() {
    // Decodes to "..%2Fsecurity.js": one opaque name that does not exist.
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/..%252Fsecurity.js", true),
        Verdict::NotFound
    ));
}

#[test]
fn unicode_lookalike_slash_is_not_found() {
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/..\u{2216}security.js", true),
        Verdict::NotFound
    ));
}

#[test]
fn null_byte_in_filename_is_not_found() {
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/index%00.html", true),
        Verdict::NotFound
    ));
}

#[test]
fn malformed_encoding_is_not_found() {
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/index%zz.html", true),
        Verdict::NotFound
    ));
}

#[test]
fn traversal_to_a_missing_target_is_still_forbidden() {
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_request("/../does-not-exist.js", true),
        Verdict::Forbidden
    ));
}

#[test]
fn confinement_opt_out_accepts_resolvable_paths() {
    let (_tmp, root) = provision();

    let verdict = root.resolve_request("/../security.js", false);
    let resolved = verdict.into_resolved().expect("unconfined should allow");
    assert_eq!(resolved.read().unwrap(), b"module.exports = {};");
}

#[test]
fn confined_target_outside_the_root_is_forbidden() {
    let (tmp, root) = provision();

    assert!(matches!(
        root.resolve_target("../security.js", true),
        Verdict::Forbidden
    ));

    // Same decision for an absolute target.
    let absolute = tmp.path().join("security.js");
    assert!(matches!(root.resolve_target(&absolute, true), Verdict::Forbidden));
}

#[test]
fn unconfined_target_outside_the_root_is_allowed() {
    let (tmp, root) = provision();

    assert!(root.resolve_target("../security.js", false).is_allow());

    let absolute = tmp.path().join("security.js");
    assert!(root.resolve_target(&absolute, false).is_allow());
}

#[test]
fn target_inside_the_root_is_allowed_when_confined() {
    let (_tmp, root) = provision();
    assert!(root.resolve_target("index.html", true).is_allow());
}

#[test]
fn missing_target_is_not_found_even_unconfined() {
    let (_tmp, root) = provision();
    assert!(matches!(
        root.resolve_target("nowhere.js", false),
        Verdict::NotFound
    ));
}

#[test]
fn try_resolve_request_reports_the_failing_stage() {
    let (_tmp, root) = provision();

    let err = root.try_resolve_request("/%00", true).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Decode(DecodeError::NullByte { .. })
    ));

    let err = root.try_resolve_request("/..%2Fsecurity.js", true).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Confine(ConfineError::Escaped { .. })
    ));

    let err = root.try_resolve_request("/missing.html", true).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Confine(ConfineError::NotFound { .. })
    ));
}

#[test]
fn verdict_helpers() {
    let (_tmp, root) = provision();

    assert!(root.resolve_request("/index.html", true).is_allow());
    assert!(!root.resolve_request("/missing.html", true).is_allow());
    assert!(root
        .resolve_request("/missing.html", true)
        .into_resolved()
        .is_none());
}

#[test]
fn resolved_paths_compare_and_render() {
    let (_tmp, root) = provision();

    let first = root
        .resolve_request("/index.html", true)
        .into_resolved()
        .unwrap();
    let second = first.clone();
    assert_eq!(first, second);
    assert!(first.display().to_string().ends_with("index.html"));
    assert!(format!("{first:?}").contains("index.html"));
}
