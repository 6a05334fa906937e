//! Graph description → configuration tree translation.
//!
//! The extension subject's predicates are partitioned into:
//!
//! - mapped predicates ([`PredicateMapping`]) → top-level keys
//! - `config` links → named sub-configurations under `private`
//! - `hasModule` links → per-module settings under `modules`
//! - predicates in the extension's private namespace with an alphanumeric
//!   local name → `private`
//!
//! `rdf:type` is ignored and anything else is dropped. Drops are returned as
//! [`Anomaly`] values next to the tree.
//!
//! Final precedence, lowest first: the `private` and `modules` buckets, then
//! the `default` module's settings, then the mapped top-level keys (which
//! include `events`).

use ext_graph::{FactStore, Term, vocab};
use serde_json::Value;

use crate::mapping::PredicateMapping;
use crate::tree::ConfigMap;
use crate::{ConfigError, Result};

const PRIVATE_NAMESPACE: &str = "http://ns.ontowiki.net/SysOnt/ExtensionConfig/privateNamespace";
const SUB_CONFIG: &str = "http://ns.ontowiki.net/SysOnt/ExtensionConfig/config";
const HAS_MODULE: &str = "http://ns.ontowiki.net/SysOnt/ExtensionConfig/hasModule";
const SUB_CONFIG_ID: &str = "http://ns.ontowiki.net/SysOnt/ExtensionConfig/id";

/// Module whose settings are lifted into the extension's own keys.
const DEFAULT_MODULE: &str = "default";

/// Data that was dropped during translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// A sub-configuration without an `id`; it is omitted.
    MissingSubConfigName { node: String },
    /// A sub-configuration that links back to one of its ancestors.
    SubConfigCycle { node: String },
    /// A module subject outside the private namespace or with a
    /// non-alphanumeric local name.
    InvalidModuleName { module: String },
    /// A predicate that is neither mapped nor a valid private key.
    DroppedPredicate { subject: String, predicate: String },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSubConfigName { node } => write!(f, "sub-config {node} has no id"),
            Self::SubConfigCycle { node } => write!(f, "sub-config {node} is part of a cycle"),
            Self::InvalidModuleName { module } => write!(f, "invalid module name {module}"),
            Self::DroppedPredicate { subject, predicate } => {
                write!(f, "dropped predicate {predicate} on {subject}")
            }
        }
    }
}

/// Result of translating one graph document.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub config: ConfigMap,
    pub anomalies: Vec<Anomaly>,
}

/// Translates an extension's fact store into a configuration tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    mapping: PredicateMapping,
}

impl Translator {
    pub fn new(mapping: PredicateMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &PredicateMapping {
        &self.mapping
    }

    /// Translate the extension described by the document based at
    /// `base_dir` (the extension directory with a trailing `/`).
    pub fn translate(&self, store: &FactStore, base_dir: &str) -> Result<Translation> {
        let subject = store
            .single_value(base_dir, vocab::FOAF_PRIMARY_TOPIC)
            .map(|term| term.value().to_string())
            .ok_or_else(|| ConfigError::MissingPrimarySubject {
                base: base_dir.to_string(),
            })?;
        let private_ns = store
            .single_value(&subject, PRIVATE_NAMESPACE)
            .map(|term| term.value().to_string());

        let mut pass = Pass {
            store,
            mapping: &self.mapping,
            private_ns: private_ns.as_deref(),
            anomalies: Vec::new(),
        };

        let mut default = ConfigMap::new();
        let mut private = ConfigMap::new();
        let mut modules = ConfigMap::new();
        let mut sub_configs = Vec::new();
        let mut module_subjects = Vec::new();

        for (predicate, objects) in store.predicates_and_objects(&subject) {
            match predicate.as_str() {
                SUB_CONFIG => {
                    sub_configs.extend(objects.iter().map(|o| o.value().to_string()));
                    continue;
                }
                HAS_MODULE => {
                    module_subjects.extend(objects.iter().map(|o| o.value().to_string()));
                    continue;
                }
                PRIVATE_NAMESPACE | vocab::RDF_TYPE => continue,
                _ => {}
            }

            let (key, section) = if let Some(key) = self.mapping.key_for(predicate) {
                (key.to_string(), &mut default)
            } else if let Some(key) = pass.private_key(predicate) {
                (key, &mut private)
            } else {
                pass.dropped(&subject, predicate);
                continue;
            };
            for object in objects {
                add_value(section, &key, term_value(object));
            }
        }

        for node in &sub_configs {
            let mut ancestors = Vec::new();
            if let Some((name, settings)) = pass.sub_config(node, &mut ancestors) {
                private.insert(name, Value::Object(settings));
            }
        }

        for module in &module_subjects {
            let Some(name) = pass.private_key(module).map(|n| n.to_lowercase()) else {
                tracing::warn!(module = %module, "module outside private namespace, skipping");
                pass.anomalies.push(Anomaly::InvalidModuleName {
                    module: module.clone(),
                });
                continue;
            };
            modules.insert(name, Value::Object(pass.module_settings(module)));
        }

        let mut config = ConfigMap::new();
        config.insert("private".into(), Value::Object(private));
        let default_module = modules.remove(DEFAULT_MODULE);
        config.insert("modules".into(), Value::Object(modules));
        if let Some(Value::Object(settings)) = default_module {
            config.extend(settings);
        }
        config.extend(default);

        Ok(Translation {
            config,
            anomalies: pass.anomalies,
        })
    }
}

/// State shared by the recursive parts of one translation.
struct Pass<'a> {
    store: &'a FactStore,
    mapping: &'a PredicateMapping,
    private_ns: Option<&'a str>,
    anomalies: Vec<Anomaly>,
}

impl Pass<'_> {
    fn private_key(&self, iri: &str) -> Option<String> {
        local_key(iri, self.private_ns?)
    }

    fn dropped(&mut self, subject: &str, predicate: &str) {
        tracing::debug!(%subject, %predicate, "dropping unmapped predicate");
        self.anomalies.push(Anomaly::DroppedPredicate {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
        });
    }

    /// Resolve a sub-configuration node into `(id, settings)`.
    ///
    /// Nested sub-configurations become entries of the returned settings,
    /// keyed by their own ids.
    fn sub_config(&mut self, node: &str, ancestors: &mut Vec<String>) -> Option<(String, ConfigMap)> {
        if ancestors.iter().any(|a| a == node) {
            tracing::warn!(%node, "sub-config cycle, skipping");
            self.anomalies.push(Anomaly::SubConfigCycle {
                node: node.to_string(),
            });
            return None;
        }
        ancestors.push(node.to_string());

        let store = self.store;
        let mut settings = ConfigMap::new();
        let mut name = None;
        for (predicate, objects) in store.predicates_and_objects(node) {
            match predicate.as_str() {
                vocab::RDF_TYPE => {}
                SUB_CONFIG_ID => {
                    name = objects
                        .first()
                        .map(|o| o.value().to_string())
                        .filter(|n| !n.is_empty());
                }
                SUB_CONFIG => {
                    for nested in objects {
                        if let Some((id, nested_settings)) = self.sub_config(nested.value(), ancestors) {
                            settings.insert(id, Value::Object(nested_settings));
                        }
                    }
                }
                _ => {
                    let key = self
                        .mapping
                        .key_for(predicate)
                        .map(str::to_string)
                        .or_else(|| self.private_key(predicate));
                    let Some(key) = key else {
                        self.dropped(node, predicate);
                        continue;
                    };
                    for object in objects {
                        add_value(&mut settings, &key, term_value(object));
                    }
                }
            }
        }
        ancestors.pop();

        match name {
            Some(name) => Some((name, settings)),
            None => {
                tracing::warn!(%node, "sub-config has no id, omitting it");
                self.anomalies.push(Anomaly::MissingSubConfigName {
                    node: node.to_string(),
                });
                None
            }
        }
    }

    /// Module settings only accept keys from the configuration vocabulary.
    fn module_settings(&self, module: &str) -> ConfigMap {
        let mut settings = ConfigMap::new();
        for (predicate, objects) in self.store.predicates_and_objects(module) {
            let Some(key) = local_key(predicate, vocab::EXTENSION_CONFIG_NS) else {
                continue;
            };
            for object in objects {
                add_value(&mut settings, &key, term_value(object));
            }
        }
        settings
    }
}

/// The local name of `iri` under `namespace`, if it is `[A-Za-z0-9]+`.
fn local_key(iri: &str, namespace: &str) -> Option<String> {
    let local = iri.strip_prefix(namespace)?;
    if !local.is_empty() && local.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(local.to_string())
    } else {
        None
    }
}

fn term_value(term: &Term) -> Value {
    match term.as_boolean() {
        Some(flag) => Value::Bool(flag),
        None => Value::String(term.value().to_string()),
    }
}

/// First value is stored as-is, the second turns the slot into a list,
/// further values are appended.
fn add_value(map: &mut ConfigMap, key: &str, value: Value) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}
