//! End-to-end tests for the `extmgr` binary

use assert_cmd::Command;
use ext_test_utils::{Doap, TestExtensions};
use predicates::prelude::*;
use serde_json::{Value, json};

/// Get a Command for the extmgr binary pointed at `tree`
fn extmgr(tree: &TestExtensions) -> Command {
    let mut cmd = Command::cargo_bin("extmgr").expect("Failed to find extmgr binary");
    cmd.env_remove("EXTMGR_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("EXTMGR_ROOT", tree.root())
        .env("EXTMGR_CACHE", tree.cache_path());
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}

fn feed_tree() -> TestExtensions {
    let tree = TestExtensions::new();
    tree.add(
        "feed",
        &Doap::new("feed")
            .enabled(true)
            .templates("templates")
            .private("limit", "5")
            .module("Recent", &[("context", "main.content")]),
    );
    tree.write_file("feed/FeedController.wasm", "");
    tree.write_file("feed/FeedHelper.wasm", "");
    tree.write_file("feed/RecentModule.wasm", "");
    tree.add("quiet", &Doap::new("quiet").enabled(false));
    tree
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("extmgr")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("hooks"));
}

#[test]
fn missing_root_is_reported() {
    Command::cargo_bin("extmgr")
        .unwrap()
        .env_remove("EXTMGR_ROOT")
        .env_remove("EXTMGR_CONFIG")
        .env("NO_COLOR", "1")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no extension root"));
}

#[test]
fn scan_writes_cache_then_reports_fresh() {
    let tree = feed_tree();

    let first = stdout_json(extmgr(&tree).args(["scan", "--json"]));
    assert_eq!(first["cache_written"], json!(true));
    assert_eq!(first["changes"]["feed"], json!("both"));
    tree.assert_exists("cache/extensions.json");

    let second = stdout_json(extmgr(&tree).args(["scan", "--json"]));
    assert_eq!(second["cache_written"], json!(false));
    assert_eq!(second["changes"], json!({}));
}

#[test]
fn forced_scan_reloads_everything() {
    let tree = feed_tree();
    extmgr(&tree).arg("scan").assert().success();

    let outcome = stdout_json(extmgr(&tree).args(["scan", "--force", "--json"]));
    assert_eq!(outcome["changes"].as_object().unwrap().len(), 2);
}

#[test]
fn scan_text_output_names_failures() {
    let tree = feed_tree();
    tree.add_raw("broken", "@prefix : <http://example.org/> .\n:a :b ( :c ) .\n");

    extmgr(&tree)
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failures"))
        .stdout(predicate::str::contains("broken"));
}

#[test]
fn list_marks_components() {
    let tree = feed_tree();

    let entries = stdout_json(extmgr(&tree).args(["list", "--json"]));
    assert_eq!(
        entries,
        json!([
            { "name": "feed", "enabled": true, "component": true },
            { "name": "quiet", "enabled": false, "component": false },
        ])
    );

    extmgr(&tree)
        .args(["list", "--enabled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feed"))
        .stdout(predicate::str::contains("quiet").not());
}

#[test]
fn show_prints_descriptor_and_module_view() {
    let tree = feed_tree();

    let config = stdout_json(extmgr(&tree).args(["show", "feed"]));
    assert_eq!(config["name"], json!("feed"));
    assert_eq!(config["private"], json!({ "limit": "5" }));
    assert!(config.get("context").is_none());

    let view = stdout_json(extmgr(&tree).args(["show", "feed", "--module", "recent"]));
    assert_eq!(view["context"], json!("main.content"));
}

#[test]
fn show_unknown_extension_fails() {
    let tree = feed_tree();
    extmgr(&tree)
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn private_prints_private_section() {
    let tree = feed_tree();
    tree.write_override("feed", "[private]\nlimit = 9\n");

    let private = stdout_json(extmgr(&tree).args(["private", "feed"]));
    assert_eq!(private, json!({ "limit": "9" }));
}

#[test]
fn paths_use_url_base() {
    let tree = feed_tree();

    let paths = stdout_json(extmgr(&tree).args(["--url-base", "https://example.org/ow//", "paths", "feed", "--json"]));
    assert_eq!(paths["url"], json!("https://example.org/ow/feed/"));
    assert!(paths["templates"].as_str().unwrap().ends_with("feed/templates/"));
    assert_eq!(paths["helpers"], Value::Null);
}

#[test]
fn hooks_show_registrations_and_helper_init() {
    let tree = feed_tree();

    let entries = stdout_json(extmgr(&tree).args(["hooks", "--json"]));
    let kinds: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["script-path", "script-path", "module"]);

    let entries = stdout_json(extmgr(&tree).args(["hooks", "--shutdown", "--json"]));
    assert!(
        entries
            .as_array()
            .unwrap()
            .contains(&json!({ "kind": "helper-init", "component": "feed" }))
    );
}

#[test]
fn logs_stay_off_stdout() {
    let tree = feed_tree();
    let output = extmgr(&tree)
        .args(["--verbose", "scan", "--json"])
        .assert()
        .success()
        .get_output()
        .clone();

    assert!(serde_json::from_slice::<Value>(&output.stdout).is_ok());
    assert!(String::from_utf8_lossy(&output.stderr).contains("scan complete"));
}
