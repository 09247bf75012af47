//! # Shirabe Store
//!
//! 推論・検証エンジンのためのインメモリ RDF トリプルストア
//! 由来 (provenance) タグ付きで、主語・述語・目的語のインデックスを持つ

pub mod cache;
pub mod provenance;
pub mod store;

pub use cache::OntologyCache;
pub use provenance::{GraphId, Provenance};
pub use store::{StoredTriple, TripleStore};
