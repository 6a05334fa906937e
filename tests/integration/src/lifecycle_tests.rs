//! Multi-pass scenarios: a manager per process sharing one cache document.

use std::time::Duration;

use ext_fs::NormalizedPath;
use ext_manager::{ChangeKind, ExtensionManager, ManagerOptions, Recorder, Registration};
use ext_test_utils::{Doap, TestExtensions};
use pretty_assertions::assert_eq;
use serde_json::json;

const OLD: Duration = Duration::from_secs(600);
const CACHE_AGE: Duration = Duration::from_secs(60);

fn options(tree: &TestExtensions) -> ManagerOptions {
    ManagerOptions::new(tree.root()).with_cache_file(tree.cache_path())
}

fn site() -> TestExtensions {
    let tree = TestExtensions::new();
    tree.add("feed", &Doap::new("feed").enabled(true).private("limit", "5"));
    tree.write_file("feed/FeedController.wasm", "");
    tree.write_file("feed/FeedHelper.wasm", "");
    tree.add("tags", &Doap::new("tags").enabled(false));
    tree.write_override("tags", "enabled = on\n");
    tree.age_all(OLD);
    tree
}

#[test]
fn second_process_starts_from_cache() {
    let tree = site();
    let first = ExtensionManager::new(options(&tree)).unwrap();
    assert!(first.last_scan().cache_written);
    let written = tree.read_cache();

    let second = ExtensionManager::new(options(&tree)).unwrap();

    assert!(second.last_scan().changes.is_empty());
    assert_eq!(second.extensions(), first.extensions());
    assert!(second.is_extension_active("tags"));
    assert_eq!(tree.read_cache(), written);
}

#[test]
fn override_edit_between_processes() {
    let tree = site();
    ExtensionManager::new(options(&tree)).unwrap();
    tree.age_cache(CACHE_AGE);

    tree.write_override("feed", "[private]\nlimit = 12\n");
    tree.touch_override("feed");
    let manager = ExtensionManager::new(options(&tree)).unwrap();

    assert_eq!(
        manager.last_scan().changes.iter().collect::<Vec<_>>(),
        vec![(&"feed".to_string(), &ChangeKind::Local)]
    );
    assert_eq!(
        manager.private_config("feed").unwrap(),
        *json!({ "limit": "12" }).as_object().unwrap()
    );
}

#[test]
fn rescan_picks_up_new_extension_and_reregisters() {
    let tree = site();
    let recorder = Recorder::new();
    let mut manager = ExtensionManager::with_collaborators(options(&tree), recorder.collaborators()).unwrap();
    assert_eq!(manager.on_route_shutdown(), 1);
    tree.age_cache(CACHE_AGE);
    recorder.take();

    tree.add("wiki", &Doap::new("wiki").enabled(true));
    tree.write_file("wiki/WikiController.wasm", "");
    tree.write_file("wiki/WikiHelper.wasm", "");
    let outcome = manager.rescan().unwrap();

    assert_eq!(outcome.changes.get("wiki"), Some(&ChangeKind::Both));
    assert!(manager.is_component_registered("wiki"));

    let entries = recorder.take();
    let wiki_dir = NormalizedPath::new(tree.extension_dir("wiki")).to_dir_string();
    assert!(entries.contains(&Registration::ScriptPath { path: wiki_dir }));
    // shutdown already ran, so the new helper comes up immediately
    assert!(entries.contains(&Registration::HelperInit {
        component: "wiki".into()
    }));
    // the existing helper is not initialized a second time
    assert!(!entries.contains(&Registration::HelperInit {
        component: "feed".into()
    }));
}

#[test]
fn removed_extension_disappears_from_registry() {
    let tree = site();
    let mut manager = ExtensionManager::new(options(&tree)).unwrap();
    tree.age_cache(CACHE_AGE);

    tree.remove_extension("feed");
    tree.age_root(Duration::ZERO);
    manager.rescan().unwrap();

    assert!(!manager.is_extension_registered("feed"));
    assert!(!manager.is_component_registered("feed"));
    let cached: serde_json::Value = serde_json::from_str(&tree.read_cache()).unwrap();
    assert!(cached.get("feed").is_none());
    assert!(cached.get("tags").is_some());
}
