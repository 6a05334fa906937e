//! Object terms of a fact.

use crate::vocab;

/// The object position of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named resource (absolute IRI) or a blank node label (`_:b0`).
    Resource(String),
    /// A literal value with optional datatype IRI and language tag.
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    pub fn resource(iri: impl Into<String>) -> Self {
        Self::Resource(iri.into())
    }

    /// A plain literal without datatype or language.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// The lexical value: the IRI for resources, the text for literals.
    pub fn value(&self) -> &str {
        match self {
            Self::Resource(iri) => iri,
            Self::Literal { value, .. } => value,
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }

    /// `Some` for literals typed as `xsd:boolean`.
    ///
    /// Only the lexical form `true` reads as true; `1` does not.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Literal {
                value,
                datatype: Some(datatype),
                ..
            } if datatype == vocab::XSD_BOOLEAN => Some(value == "true"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resource(iri) if iri.starts_with("_:") => write!(f, "{iri}"),
            Self::Resource(iri) => write!(f, "<{iri}>"),
            Self::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "{value:?}")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")?;
                } else if let Some(datatype) = datatype {
                    write!(f, "^^<{datatype}>")?;
                }
                Ok(())
            }
        }
    }
}
