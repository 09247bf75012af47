//! SHACL 形状生成と制約検証エンジン
//!
//! このクレートは以下を提供します:
//! - オントロジーの OWL 宣言から SHACL 形状グラフを導出 (generator)
//! - 形状グラフの読み込み (shapes)
//! - データグラフに対する制約検証 (validator)
//! - 検証レポートとポリシー判定 (report)
//!
//! 形状はトリプルとして形状グラフに格納され、検証時に構造体へ
//! パースされます。検証は単発・ステートレスな変換です。

pub mod generator;
pub mod report;
pub mod shapes;
pub mod validator;

pub use generator::generate_shapes_from_ontology;
pub use report::{Severity, ValidationPolicy, ValidationReport, Violation};
pub use shapes::{NodeKind, NodeShape, PropertyShape, ShapesGraph};
pub use validator::ShaclValidator;

use shirabe_core::model::Iri;
use thiserror::Error;

/// 形状グラフの解析・検証実行時のエラー
#[derive(Debug, Error)]
pub enum ShaclValidationError {
    #[error("property shape {0} has no sh:path")]
    MissingPath(Iri),

    #[error("malformed constraint on shape {shape}: {detail}")]
    MalformedConstraint { shape: Iri, detail: String },
}

/// 形状生成時のエラー
#[derive(Debug, Error)]
pub enum ValidationReportError {
    #[error("ontology declares a class that is not an IRI: {0}")]
    InvalidClassDeclaration(String),

    #[error("ontology declares a property that is not an IRI: {0}")]
    InvalidPropertyDeclaration(String),
}

/// ポリシーによる否決。完全なレポートを保持する。
#[derive(Debug, Error)]
pub enum ValidationPolicyError {
    #[error(
        "validation policy rejected report: {} violations, {} warnings",
        .report.violation_count(),
        .report.warning_count()
    )]
    Rejected { report: Box<report::ValidationReport> },
}

impl ValidationPolicyError {
    /// 否決されたレポートへのアクセス
    pub fn report(&self) -> &report::ValidationReport {
        match self {
            ValidationPolicyError::Rejected { report } => report,
        }
    }
}

/// `validate_with_policy` が返しうるエラーの合併
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Shacl(#[from] ShaclValidationError),

    #[error(transparent)]
    Policy(#[from] ValidationPolicyError),
}
