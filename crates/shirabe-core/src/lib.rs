//! # Shirabe Core
//!
//! RDFグラフ操作のためのコアデータモデル
//! トリプル、用語 (IRI / ブランクノード / リテラル)、標準語彙を提供

pub mod model;
pub mod vocabulary;

pub use model::{BlankNode, Iri, Literal, Term, Triple};
