//! End-to-end test for the resolution pipeline
//!
//! This test exercises the complete flow: graph document -> fact store ->
//! translation -> override merge -> cache -> registry.

use ext_config::{ExtensionLoader, Translator};
use ext_fs::NormalizedPath;
use ext_graph::{FactStore, vocab};
use ext_manager::{ExtensionManager, ManagerOptions, Recorder, Registration};
use ext_test_utils::TestExtensions;
use pretty_assertions::assert_eq;
use serde_json::json;

const HISTORY_DOAP: &str = r#"
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix doap: <http://usefulinc.com/ns/doap#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owconfig: <http://ns.ontowiki.net/SysOnt/ExtensionConfig/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix : <https://example.org/history/doap.n3#> .

<> foaf:primaryTopic :history .

:history a doap:Project ;
  doap:name "history" ;
  doap:description "Keeps a log of changes." ;
  owconfig:privateNamespace <https://example.org/history/doap.n3#> ;
  owconfig:enabled "true"^^xsd:boolean ;
  owconfig:templates "templates" ;
  owconfig:pluginEvent "onAddStatement", "onDeleteStatement" ;
  :pageSize "20" ;
  owconfig:hasModule :Default, :Changes ;
  owconfig:config [
    owconfig:id "feed" ;
    :title "Recent changes" ;
    :format "atom"
  ] .

:Default a owconfig:Module ;
  owconfig:priority "40" .

:Changes a owconfig:Module ;
  owconfig:context "main.window.history" ;
  owconfig:priority "5" .
"#;

const HISTORY_INI: &str = "\
; local deployment tweaks
[private]
pageSize = 50
feed.format = rss
";

/// One extension written by hand, with an override and component files.
fn setup_history() -> TestExtensions {
    let tree = TestExtensions::new();
    tree.add_raw("history", HISTORY_DOAP);
    tree.write_override("history", HISTORY_INI);
    for file in [
        "HistoryController.wasm",
        "HistoryHelper.wasm",
        "ChangesModule.wasm",
        "HistoryPlugin.wasm",
    ] {
        tree.write_file(&format!("history/{file}"), "");
    }
    tree
}

#[test]
fn graph_parses_into_facts() {
    let base = "/srv/extensions/history/";
    let store = FactStore::parse(HISTORY_DOAP, base).unwrap();

    let topic = store.single_value(base, vocab::FOAF_PRIMARY_TOPIC).unwrap();
    assert!(topic.is_resource());
    assert_eq!(topic.value(), "https://example.org/history/doap.n3#history");
    let pages = store
        .single_value(topic.value(), "https://example.org/history/doap.n3#pageSize")
        .unwrap();
    assert_eq!(pages.value(), "20");
}

#[test]
fn loader_merges_graph_and_override() {
    let tree = setup_history();
    let loader = ExtensionLoader::new(NormalizedPath::new(tree.root()), Translator::default());

    let loaded = loader.load("history").unwrap();
    let config = loaded.config;

    assert_eq!(config.name(), Some("history"));
    assert!(config.enabled());
    assert_eq!(config.get("description"), Some(&json!("Keeps a log of changes.")));
    assert_eq!(config.get("priority"), Some(&json!("40")));
    assert_eq!(config.events(), vec!["onAddStatement", "onDeleteStatement"]);
    assert_eq!(
        config.private().cloned().map(serde_json::Value::Object),
        Some(json!({
            "pageSize": "50",
            "feed": { "title": "Recent changes", "format": "rss" }
        }))
    );
    assert_eq!(
        config.module("changes").and_then(|m| m.get("context")),
        Some(&json!("main.window.history"))
    );
    assert!(loaded.anomalies.is_empty(), "{:?}", loaded.anomalies);
}

#[test]
fn manager_registers_resolved_extension() {
    let tree = setup_history();
    let recorder = Recorder::new();
    let options = ManagerOptions::new(tree.root()).with_cache_file(tree.cache_path());

    let mut manager = ExtensionManager::with_collaborators(options, recorder.collaborators()).unwrap();

    assert!(manager.is_component_registered("history"));
    let entries = recorder.take();
    let dir = NormalizedPath::new(tree.extension_dir("history")).to_dir_string();
    assert_eq!(entries[0], Registration::ScriptPath { path: dir.clone() });
    assert!(entries.contains(&Registration::Plugin {
        key: "history".into(),
        file_name: "HistoryPlugin.wasm".into(),
        path: dir,
    }));
    let module_contexts: Vec<String> = entries
        .iter()
        .filter_map(|r| match r {
            Registration::Module { context, .. } => Some(context.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(module_contexts, vec!["main.window.history".to_string()]);

    assert_eq!(manager.on_route_shutdown(), 1);
    assert_eq!(
        recorder.take(),
        vec![
            Registration::HelperLoaded {
                component: "history".into(),
                class: "HistoryHelper".into()
            },
            Registration::HelperInit {
                component: "history".into()
            },
        ]
    );
}

#[test]
fn cache_document_holds_merged_configuration() {
    let tree = setup_history();
    let options = ManagerOptions::new(tree.root()).with_cache_file(tree.cache_path());
    let manager = ExtensionManager::new(options).unwrap();

    let cached: serde_json::Value = serde_json::from_str(&tree.read_cache()).unwrap();
    assert_eq!(
        cached["history"],
        serde_json::to_value(manager.extension_config("history").unwrap()).unwrap()
    );
    assert_eq!(cached["history"]["private"]["pageSize"], json!("50"));
}
