//! # Shirabe - RDFS Reasoning & SHACL Validation Stack
//!
//! Shirabe はオントロジー駆動の知識グラフのための推論・検証スタックです。
//! インメモリのトリプルストア上で RDFS 含意を実体化し、OWL 宣言から
//! 生成した (または手書きの) SHACL 形状に対してデータグラフを検証します。
//!
//! ## Quick Start
//!
//! ```rust
//! use shirabe::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut data = TripleStore::new();
//!     data.insert(
//!         Triple::new(
//!             Term::iri("http://example.org/Dog"),
//!             shirabe::core::vocabulary::rdfs_subclass_of(),
//!             Term::iri("http://example.org/Animal"),
//!         ),
//!         Provenance::asserted("example"),
//!     );
//!     data.insert(
//!         Triple::new(
//!             Term::iri("http://example.org/rex"),
//!             shirabe::core::vocabulary::rdf_type(),
//!             Term::iri("http://example.org/Dog"),
//!         ),
//!         Provenance::asserted("example"),
//!     );
//!
//!     // Materialize RDFS entailments
//!     let result = RdfsReasoner::new().reason(&mut data, &ReasonerConfig::rdfs())?;
//!     println!("inferred {} triples", result.inferred_triple_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Shirabe consists of several specialized crates:
//!
//! - **`shirabe-core`**: RDF data model (terms, triples) and vocabulary
//! - **`shirabe-store`**: in-memory indexed triple store with provenance
//! - **`shirabe-rdfs`**: RDFS rule catalog and fixed-point inference engine
//! - **`shirabe-shacl`**: SHACL shape generation, validation and reports
//!
//! ## Feature Flags
//!
//! - `full` (default): All crates included
//! - `core`: Only core data models
//! - `store`: Triple store functionality
//! - `rdfs`: Reasoning engine
//! - `shacl`: Shape generation and validation

// Re-export all public APIs from sub-crates (feature-gated)

#[cfg(feature = "shirabe-core")]
pub use shirabe_core as core;

#[cfg(feature = "shirabe-store")]
pub use shirabe_store as store;

#[cfg(feature = "shirabe-rdfs")]
pub use shirabe_rdfs as rdfs;

#[cfg(feature = "shirabe-shacl")]
pub use shirabe_shacl as shacl;

// Convenience re-exports for common types (feature-gated)
#[cfg(feature = "shirabe-core")]
pub use shirabe_core::model;

#[cfg(feature = "shirabe-store")]
pub use shirabe_store::{OntologyCache, Provenance, TripleStore};

#[cfg(feature = "shirabe-rdfs")]
pub use shirabe_rdfs::{RdfsReasoner, ReasonerConfig, ReasoningError, RuleParseError};

#[cfg(feature = "shirabe-shacl")]
pub use shirabe_shacl::{ShaclValidator, ValidationPolicy, ValidationReport};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use shirabe::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "shirabe-core")]
    pub use crate::model::*;

    #[cfg(feature = "shirabe-store")]
    pub use crate::{OntologyCache, Provenance, TripleStore};

    #[cfg(feature = "shirabe-rdfs")]
    pub use crate::{RdfsReasoner, ReasonerConfig};
    #[cfg(feature = "shirabe-rdfs")]
    pub use shirabe_rdfs::{ReasoningResult, RuleName};

    #[cfg(feature = "shirabe-shacl")]
    pub use crate::{ShaclValidator, ValidationPolicy, ValidationReport};
    #[cfg(feature = "shirabe-shacl")]
    pub use shirabe_shacl::generate_shapes_from_ontology;

    // Common external types
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
}
