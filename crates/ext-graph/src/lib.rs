//! In-memory fact store for extension graph descriptions.
//!
//! Every extension ships a small subject-predicate-object document
//! (`doap.n3`) describing its metadata. This crate reads those documents as
//! Turtle with `rio_turtle` and groups the resulting facts by subject.
//!
//! # Example
//!
//! ```
//! use ext_graph::{FactStore, Term};
//!
//! let doc = r#"
//! @prefix foaf: <http://xmlns.com/foaf/0.1/> .
//! <> foaf:primaryTopic <http://example.org/history> .
//! "#;
//! let store = FactStore::parse(doc, "/srv/extensions/history/").unwrap();
//! let topic = store
//!     .single_value("/srv/extensions/history/", "http://xmlns.com/foaf/0.1/primaryTopic")
//!     .unwrap();
//! assert_eq!(topic, &Term::resource("http://example.org/history"));
//! ```

pub mod error;
mod parser;
pub mod store;
pub mod term;
pub mod vocab;

pub use error::{GraphError, Result};
pub use store::{FactStore, document_base};
pub use term::Term;
