//! Turtle reading through `rio_turtle`.
//!
//! A filesystem base is not an IRI, so relative references are resolved
//! against its `file:` form and mapped back to paths afterwards. In a
//! document under `/srv/extensions/history/`, `<>` names that directory.

use oxiri::Iri;
use rio_api::model::{Literal, NamedNode, Subject, Term as RioTerm, Triple};
use rio_api::parser::{ParseError as _, TriplesParser};
use rio_turtle::{TurtleError, TurtleParser};

use crate::{FactStore, GraphError, Result, Term};

/// Parse `text` and add every fact to `store`
pub(crate) fn parse_into(text: &str, base: &str, store: &mut FactStore) -> Result<()> {
    let base = DocumentBase::new(base)?;
    let mut parser = TurtleParser::new(text.as_bytes(), Some(base.iri.clone()));
    parser
        .parse_all(&mut |triple: Triple<'_>| base.insert(store, triple))
        .map_err(Failure::into_graph_error)
}

struct DocumentBase {
    iri: Iri<String>,
    /// Scheme prefix added to a local directory base, stripped again from
    /// every IRI that carries it
    file_prefix: Option<&'static str>,
}

impl DocumentBase {
    fn new(base: &str) -> Result<Self> {
        if let Ok(iri) = Iri::parse(base.to_string()) {
            return Ok(Self {
                iri,
                file_prefix: None,
            });
        }

        let prefix = if base.starts_with('/') { "file://" } else { "file:///" };
        let encoded = base.replace('%', "%25").replace(' ', "%20");
        let iri = Iri::parse(format!("{prefix}{encoded}")).map_err(|e| GraphError::InvalidBase {
            base: base.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            iri,
            file_prefix: Some(prefix),
        })
    }

    fn resource(&self, node: NamedNode<'_>) -> String {
        self.file_prefix
            .and_then(|prefix| node.iri.strip_prefix(prefix))
            .map(|path| path.replace("%20", " ").replace("%25", "%"))
            .unwrap_or_else(|| node.iri.to_string())
    }

    fn insert(&self, store: &mut FactStore, triple: Triple<'_>) -> std::result::Result<(), Failure> {
        let subject = match triple.subject {
            Subject::NamedNode(node) => self.resource(node),
            Subject::BlankNode(node) => format!("_:{}", node.id),
            Subject::Triple(_) => return Err(Failure::QuotedTriple),
        };
        let object = match triple.object {
            RioTerm::NamedNode(node) => Term::resource(self.resource(node)),
            RioTerm::BlankNode(node) => Term::resource(format!("_:{}", node.id)),
            RioTerm::Literal(Literal::Simple { value }) => Term::literal(value),
            RioTerm::Literal(Literal::LanguageTaggedString { value, language }) => Term::Literal {
                value: value.to_string(),
                datatype: None,
                language: Some(language.to_string()),
            },
            RioTerm::Literal(Literal::Typed { value, datatype }) => Term::typed(value, datatype.iri),
            RioTerm::Triple(_) => return Err(Failure::QuotedTriple),
        };
        store.insert(subject, self.resource(triple.predicate), object);
        Ok(())
    }
}

enum Failure {
    Syntax(TurtleError),
    QuotedTriple,
}

impl From<TurtleError> for Failure {
    fn from(error: TurtleError) -> Self {
        Self::Syntax(error)
    }
}

impl Failure {
    fn into_graph_error(self) -> GraphError {
        match self {
            Self::Syntax(error) => {
                let (line, column) = error
                    .textual_position()
                    .map(|pos| (pos.line_number() as usize + 1, pos.byte_number() as usize + 1))
                    .unwrap_or((0, 0));
                GraphError::Parse {
                    line,
                    column,
                    message: error.to_string(),
                }
            }
            Self::QuotedTriple => GraphError::Parse {
                line: 0,
                column: 0,
                message: "quoted triples are not supported".to_string(),
            },
        }
    }
}
