//! CLI Integration Tests
//!
//! These run the actual `canopy` binary against a snapshot in a temporary
//! directory and check the JSON it prints.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use serde_json::Value;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Run canopy and return (stdout, stderr, success)
fn run_canopy(args: &[&str], store: &Path) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_canopy"))
        .arg("-s")
        .arg(store)
        .args(["-f", "json"])
        .args(args)
        .output()
        .expect("Failed to execute canopy");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Run canopy, require success and parse stdout
fn run_json(args: &[&str], store: &Path) -> Value {
    let (stdout, stderr, success) = run_canopy(args, store);
    assert!(success, "{:?} failed: {} {}", args, stdout, stderr);
    serde_json::from_str(&stdout).expect("stdout should be JSON")
}

// ============================================================================
// Initialization Tests
// ============================================================================

#[test]
fn test_cli_init_creates_snapshot() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");

    let json = run_json(&["init"], &store);
    assert_eq!(json["status"], "ok");
    assert!(store.exists(), "snapshot file should be created");
}

#[test]
fn test_cli_init_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");

    run_json(&["init"], &store);
    run_json(&["set", "a/b", "x"], &store);

    let (stdout, _stderr, success) = run_canopy(&["init"], &store);
    assert!(!success, "second init should fail");
    assert!(stdout.contains("already exists"));

    run_json(&["init", "--force"], &store);
    let status = run_json(&["status"], &store);
    assert_eq!(status["entries"], 0);
}

#[test]
fn test_cli_default_store_path() {
    let output = Command::new(env!("CARGO_BIN_EXE_canopy"))
        .args(["--help"])
        .output()
        .expect("Failed to execute canopy");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("[default: trie.canopy]"),
        "Default store path should be trie.canopy, got: {}",
        stdout
    );
}

// ============================================================================
// Value Tests
// ============================================================================

#[test]
fn test_cli_set_get_delete() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    run_json(&["init"], &store);

    let set = run_json(&["set", "docs/guide", "public"], &store);
    assert_eq!(set["status"], "ok");
    assert_eq!(set["path"], serde_json::json!(["docs", "guide"]));

    let get = run_json(&["get", "docs/guide"], &store);
    assert_eq!(get["value"], "public");

    run_json(&["delete", "docs/guide"], &store);
    let (stdout, _stderr, success) = run_canopy(&["get", "docs/guide"], &store);
    assert!(!success, "get after delete should fail");
    let error: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(error["status"], "error");
}

#[test]
fn test_cli_get_missing_path_fails() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    run_json(&["init"], &store);

    let (_stdout, _stderr, success) = run_canopy(&["get", "nothing/here"], &store);
    assert!(!success);
    let (_stdout, _stderr, success) = run_canopy(&["delete", "nothing"], &store);
    assert!(!success);
}

#[test]
fn test_cli_list_under() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    run_json(&["init"], &store);
    run_json(&["set", "a", "1"], &store);
    run_json(&["set", "a/b", "2"], &store);
    run_json(&["set", "a/c", "3"], &store);
    run_json(&["set", "d", "4"], &store);

    let all = run_json(&["list"], &store);
    assert_eq!(all["count"], 4);

    let under = run_json(&["list", "--under", "a"], &store);
    assert_eq!(under["count"], 3);
    assert_eq!(under["entries"][0]["path"], serde_json::json!(["a"]));
    assert_eq!(under["entries"][2]["value"], "3");
}

#[test]
fn test_cli_custom_separator() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    run_json(&["init"], &store);

    run_json(&["--separator", ".", "set", "net.example.www", "host"], &store);
    let get = run_json(&["get", "net/example/www"], &store);
    assert_eq!(get["value"], "host");
}

// ============================================================================
// Cover Tests
// ============================================================================

#[test]
fn test_cli_cover_inheritance() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    run_json(&["init"], &store);
    run_json(&["set", "foo", "V1"], &store);
    run_json(&["set", "foo/boo/hoo", "V2"], &store);

    let cover = run_json(&["cover", "foo/boo"], &store);
    assert_eq!(cover["cover"], "V1");

    let cover = run_json(&["cover", "foo/boo/hoo/deeper"], &store);
    assert_eq!(cover["cover"], "V2");

    let cover = run_json(&["cover", "elsewhere"], &store);
    assert!(cover["cover"].is_null());

    run_json(&["set-cover", "C0"], &store);
    let cover = run_json(&["cover", "elsewhere"], &store);
    assert_eq!(cover["cover"], "C0");

    run_json(&["clear-cover"], &store);
    let status = run_json(&["status"], &store);
    assert_eq!(status["has_cover"], false);
}

// ============================================================================
// Whole-Trie Tests
// ============================================================================

#[test]
fn test_cli_merge_and_diff() {
    let dir = tempdir().unwrap();
    let ours = dir.path().join("ours.canopy");
    let theirs = dir.path().join("theirs.canopy");

    run_json(&["init"], &ours);
    run_json(&["set", "a", "1"], &ours);
    run_json(&["set", "b", "2"], &ours);

    run_json(&["init"], &theirs);
    run_json(&["set", "b", "20"], &theirs);
    run_json(&["set", "c", "3"], &theirs);

    let diff = run_json(&["diff", theirs.to_str().unwrap()], &ours);
    assert_eq!(diff["added"], 1);
    assert_eq!(diff["removed"], 1);
    assert_eq!(diff["modified"], 1);

    let merged = run_json(&["merge", theirs.to_str().unwrap()], &ours);
    assert_eq!(merged["entries"], 3);
    assert_eq!(run_json(&["get", "b"], &ours)["value"], "20");
    assert_eq!(run_json(&["get", "a"], &ours)["value"], "1");
}

#[test]
fn test_cli_export_import_roundtrip() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    let copy = dir.path().join("copy.canopy");
    let export_file = dir.path().join("export.json");

    run_json(&["init"], &store);
    run_json(&["set", "x/y", "1"], &store);
    run_json(&["set", "x/z", "2"], &store);
    run_json(&["set-cover", "root"], &store);

    let (stdout, _stderr, success) = run_canopy(&["export"], &store);
    assert!(success);
    std::fs::write(&export_file, &stdout).unwrap();

    run_json(&["import", export_file.to_str().unwrap()], &copy);

    let original = run_json(&["status"], &store);
    let imported = run_json(&["status"], &copy);
    assert_eq!(original["hash"], imported["hash"]);
    assert_eq!(imported["has_cover"], true);
}

#[test]
fn test_cli_diff_under_path() {
    let dir = tempdir().unwrap();
    let ours = dir.path().join("ours.canopy");
    let theirs = dir.path().join("theirs.canopy");

    run_json(&["init"], &ours);
    run_json(&["set", "a/x", "1"], &ours);
    run_json(&["set", "b/x", "1"], &ours);

    run_json(&["init"], &theirs);
    run_json(&["set", "a/x", "2"], &theirs);
    run_json(&["set", "a/y", "3"], &theirs);

    let diff = run_json(&["diff", theirs.to_str().unwrap(), "--under", "a"], &ours);
    assert_eq!(diff["added"], 1);
    assert_eq!(diff["modified"], 1);
    assert_eq!(diff["removed"], 0);
    assert_eq!(diff["entries"][0]["path"], serde_json::json!(["a", "x"]));
}

#[test]
fn test_cli_deep_export_import_roundtrip() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    let copy = dir.path().join("copy.canopy");
    let export_file = dir.path().join("export.json");
    run_json(&["init"], &store);

    // One stored value per level gives one JSON node per level
    let mut path = String::new();
    for depth in 0..90 {
        path.push_str("/n");
        run_json(&["set", &path, &depth.to_string()], &store);
    }

    let (stdout, _stderr, success) = run_canopy(&["export"], &store);
    assert!(success);
    std::fs::write(&export_file, &stdout).unwrap();

    run_json(&["import", export_file.to_str().unwrap()], &copy);
    let imported = run_json(&["status"], &copy);
    assert_eq!(imported["entries"], 90);
    assert_eq!(imported["hash"], run_json(&["status"], &store)["hash"]);
}

#[test]
fn test_cli_import_rejects_non_canonical() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    let bad = dir.path().join("bad.json");

    // A valueless node with a single child is not canonical
    let text = r#"{"trie":{"children":{"61":{"prefix":["61"],"value":null,"children":{"62":{"prefix":["62"],"value":"x","children":{}}}}}},"cover":null}"#;
    std::fs::write(&bad, text).unwrap();

    let (_stdout, _stderr, success) = run_canopy(&["import", bad.to_str().unwrap()], &store);
    assert!(!success, "non-canonical import should be rejected");
    assert!(!store.exists());
}

#[test]
fn test_cli_corrupted_snapshot_fails() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("trie.canopy");
    run_json(&["init"], &store);
    run_json(&["set", "a", "1"], &store);

    let mut bytes = std::fs::read(&store).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    std::fs::write(&store, bytes).unwrap();

    let (stdout, _stderr, success) = run_canopy(&["status"], &store);
    assert!(!success);
    assert!(stdout.contains("Corruption"), "got: {}", stdout);
}

#[test]
fn test_cli_status_rejects_foreign_file() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("notes.txt");
    std::fs::write(&store, "just some text").unwrap();

    let (stdout, _stderr, success) = run_canopy(&["status"], &store);
    assert!(!success);
    assert!(stdout.contains("is not a canopy snapshot"), "got: {}", stdout);
}

// ============================================================================
// Query Tests
// ============================================================================

#[test]
fn test_cli_parse_query() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("unused.canopy");

    let parsed = run_json(&["parse", "{ hello { world, hi } }"], &store);
    assert_eq!(parsed["count"], 2);
    assert_eq!(
        parsed["members"],
        serde_json::json!([["hello", "hi"], ["hello", "world"]])
    );

    let (_stdout, _stderr, success) = run_canopy(&["parse", "{a,}"], &store);
    assert!(!success);
}
