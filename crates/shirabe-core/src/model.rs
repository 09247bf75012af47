//! RDF data models for ontology-guided reasoning

use crate::vocabulary;
use serde::{Deserialize, Serialize};

/// RDF IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Iri::new(s)
    }
}

/// RDF blank node label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BlankNode(pub String);

impl BlankNode {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// RDF literal with optional datatype IRI and language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<Iri>,
    pub language: Option<String>,
}

impl Literal {
    /// Plain string literal (implicitly xsd:string)
    pub fn string<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Typed literal
    pub fn typed<S: Into<String>>(value: S, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Language-tagged string literal
    pub fn lang<S: Into<String>, L: Into<String>>(value: S, language: L) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), Iri::new(vocabulary::XSD_INTEGER))
    }

    /// Effective datatype under RDF 1.1: plain literals are xsd:string,
    /// language-tagged literals are rdf:langString.
    pub fn effective_datatype(&self) -> Iri {
        if let Some(dt) = &self.datatype {
            dt.clone()
        } else if self.language.is_some() {
            Iri::new(vocabulary::RDF_LANG_STRING)
        } else {
            Iri::new(vocabulary::XSD_STRING)
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{}>", dt)?;
        }
        Ok(())
    }
}

/// RDF term occupying a subject or object position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(Iri),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Term {
    pub fn iri<S: Into<String>>(s: S) -> Self {
        Term::Iri(Iri::new(s))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// IRIs and blank nodes are resources; literals are not.
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(b) => write!(f, "{}", b),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<BlankNode> for Term {
    fn from(b: BlankNode) -> Self {
        Term::BlankNode(b)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// RDF Triple representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new<S: Into<Term>, O: Into<Term>>(subject: S, predicate: Iri, object: O) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}
