use ext_fs::NormalizedPath;
use rstest::rstest;
use tempfile::TempDir;

#[rstest]
#[case("foo/bar/baz", "foo/bar/baz")]
#[case("foo\\bar\\baz", "foo/bar/baz")]
#[case("foo/bar\\baz", "foo/bar/baz")]
fn test_normalizes_separators(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("extensions");
    assert_eq!(base.join("history").as_str(), "extensions/history");

    let with_slash = NormalizedPath::new("extensions/");
    assert_eq!(with_slash.join("history.ini").as_str(), "extensions/history.ini");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("extensions/history/doap.n3");
    let parent = path.parent().unwrap();
    assert_eq!(parent.as_str(), "extensions/history");
}

#[test]
fn test_file_name() {
    let path = NormalizedPath::new("extensions/history/HistoryPlugin.wasm");
    assert_eq!(path.file_name(), Some("HistoryPlugin.wasm"));
    assert_eq!(NormalizedPath::new("extensions/.hidden").file_name(), Some(".hidden"));
}

#[test]
fn test_canonicalize_existing_dir() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("history")).unwrap();

    let path = NormalizedPath::canonicalize(temp.path().join("history")).unwrap();
    assert!(path.is_dir());
    assert!(path.as_str().ends_with("/history"));
    assert!(!path.as_str().contains('\\'));
}

#[test]
fn test_canonicalize_missing_dir_fails() {
    let temp = TempDir::new().unwrap();
    let err = NormalizedPath::canonicalize(temp.path().join("missing")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_probes_false_for_nonexistent() {
    let path = NormalizedPath::new("/nonexistent/path/that/does/not/exist");
    assert!(!path.is_file());
    assert!(!path.is_dir());
}
