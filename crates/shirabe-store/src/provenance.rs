//! Provenance tagging for stored triples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance information for stored triples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Provenance {
    /// Claim asserted by an extraction pipeline or caller
    Asserted {
        /// Source identifier (e.g. "document-ingest", "shape-generator")
        source: String,
        /// Confidence score (0.0 to 1.0)
        confidence: Option<f64>,
    },
    /// Triple materialized by the reasoning engine
    Inferred {
        /// Rule that derived the triple
        rule: String,
    },
    /// Triple loaded from an external ontology source
    Imported {
        /// Import source (URI, file path, etc.)
        source_uri: String,
        /// Import timestamp
        imported_at: DateTime<Utc>,
    },
}

impl Provenance {
    /// Shorthand for caller-asserted data without a confidence score
    pub fn asserted<S: Into<String>>(source: S) -> Self {
        Provenance::Asserted {
            source: source.into(),
            confidence: None,
        }
    }

    pub fn is_inferred(&self) -> bool {
        matches!(self, Provenance::Inferred { .. })
    }
}

/// Graph identifier for organizing triples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GraphId {
    /// Default graph
    Default,
    /// Named graph
    Named(String),
}

impl Default for GraphId {
    fn default() -> Self {
        GraphId::Default
    }
}
