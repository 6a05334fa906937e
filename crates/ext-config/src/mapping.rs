//! Fixed predicate → configuration key table.

/// Immutable mapping from well-known predicates to configuration keys.
///
/// Predicates found here land in the extension's top-level configuration
/// under the mapped key; everything else is subject to the private
/// namespace rule.
#[derive(Debug, Clone, Copy)]
pub struct PredicateMapping {
    entries: &'static [(&'static str, &'static str)],
}

impl PredicateMapping {
    /// The standard extension vocabulary.
    pub const STANDARD: Self = Self::new(&[
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/enabled", "enabled"),
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/helperEvent", "helperEvents"),
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/pluginEvent", "events"),
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/templates", "templates"),
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/languages", "languages"),
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/defaultAction", "action"),
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/class", "classes"),
        ("http://usefulinc.com/ns/doap#name", "name"),
        ("http://usefulinc.com/ns/doap#description", "description"),
        ("http://usefulinc.com/ns/doap#maintainer", "authorUrl"),
        ("http://ns.ontowiki.net/SysOnt/ExtensionConfig/authorLabel", "author"),
    ]);

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// The configuration key for `predicate`, if it is mapped.
    pub fn key_for(&self, predicate: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(iri, _)| *iri == predicate)
            .map(|(_, key)| *key)
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}

impl Default for PredicateMapping {
    fn default() -> Self {
        Self::STANDARD
    }
}
