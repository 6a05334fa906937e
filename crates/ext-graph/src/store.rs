//! Subject-keyed fact storage.

use std::collections::HashMap;

use ext_fs::{NormalizedPath, io};

use crate::parser;
use crate::{GraphError, Result, Term};

/// Predicates of one subject with their objects, in document order.
pub type PredicateObjects = Vec<(String, Vec<Term>)>;

/// Facts of a single graph description document, grouped by subject.
///
/// Predicates keep the order in which they first appear for their subject;
/// repeated predicates accumulate their objects. Identical facts are stored
/// once.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    base: String,
    index: HashMap<String, usize>,
    subjects: Vec<(String, PredicateObjects)>,
    len: usize,
}

/// The base IRI a document at `path` resolves relative references against:
/// its directory with exactly one trailing `/`.
pub fn document_base(path: &NormalizedPath) -> String {
    path.parent()
        .map(|dir| dir.to_dir_string())
        .unwrap_or_else(|| "./".to_string())
}

impl FactStore {
    /// Create an empty store whose documents resolve against `base`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Read and parse the graph document at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let text = io::read_text(path).map_err(|source| GraphError::Io {
            path: path.to_native(),
            source,
        })?;
        let store = Self::parse(&text, &document_base(path))?;
        tracing::debug!(path = %path, facts = store.len(), "loaded graph document");
        Ok(store)
    }

    /// Parse a document from text.
    pub fn parse(text: &str, base: &str) -> Result<Self> {
        let mut store = Self::new(base);
        parser::parse_into(text, base, &mut store)?;
        Ok(store)
    }

    /// The base the store's document was resolved against.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Add a fact. Returns `false` if it was already present.
    pub fn insert(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: Term,
    ) -> bool {
        let subject = subject.into();
        let predicate = predicate.into();
        let next = self.subjects.len();
        let slot = *self.index.entry(subject.clone()).or_insert(next);
        if slot == next {
            self.subjects.push((subject, Vec::new()));
        }
        let predicates = &mut self.subjects[slot].1;
        match predicates.iter_mut().find(|(p, _)| *p == predicate) {
            Some((_, objects)) => {
                if objects.contains(&object) {
                    return false;
                }
                objects.push(object);
            }
            None => predicates.push((predicate, vec![object])),
        }
        self.len += 1;
        true
    }

    /// All predicate/object groups for `subject`; empty when unknown.
    pub fn predicates_and_objects(&self, subject: &str) -> &[(String, Vec<Term>)] {
        self.index
            .get(subject)
            .map(|&slot| self.subjects[slot].1.as_slice())
            .unwrap_or(&[])
    }

    /// The first object of `predicate` on `subject`.
    pub fn single_value(&self, subject: &str, predicate: &str) -> Option<&Term> {
        self.predicates_and_objects(subject)
            .iter()
            .find(|(p, _)| p == predicate)
            .and_then(|(_, objects)| objects.first())
    }

    /// Subjects in order of first appearance.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(|(s, _)| s.as_str())
    }

    /// Number of distinct facts.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
