//! SHACL 検証レポート

use serde::{Deserialize, Serialize};
use shirabe_core::model::{Iri, Term};
use shirabe_core::vocabulary;

/// Violation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Violation,
    Warning,
    Info,
}

impl Severity {
    pub fn as_iri(&self) -> Iri {
        match self {
            Severity::Violation => Iri::new(vocabulary::SH_VIOLATION),
            Severity::Warning => Iri::new(vocabulary::SH_WARNING),
            Severity::Info => Iri::new(vocabulary::SH_INFO),
        }
    }

    pub fn from_iri(iri: &Iri) -> Option<Self> {
        match iri.as_str() {
            vocabulary::SH_VIOLATION => Some(Severity::Violation),
            vocabulary::SH_WARNING => Some(Severity::Warning),
            vocabulary::SH_INFO => Some(Severity::Info),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Violation
    }
}

/// 1 つの制約違反
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// 検証対象のノード
    pub focus_node: Term,
    /// 違反したプロパティパス (ノード単位の違反では None)
    pub path: Option<Iri>,
    /// 違反を起こした値
    pub value: Option<Term>,
    /// Human-readable message
    pub message: String,
    pub severity: Severity,
}

/// Validation Report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// true iff `violations` is empty (severity-agnostic)
    pub conforms: bool,
    pub violations: Vec<Violation>,
    /// 検証時点でのデータグラフのトリプル数
    pub data_graph_triple_count: usize,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>, data_graph_triple_count: usize) -> Self {
        Self {
            conforms: violations.is_empty(),
            violations,
            data_graph_triple_count,
        }
    }

    /// 違反の数を取得
    pub fn violation_count(&self) -> usize {
        self.count_by_severity(Severity::Violation)
    }

    /// 警告の数を取得
    pub fn warning_count(&self) -> usize {
        self.count_by_severity(Severity::Warning)
    }

    /// 情報メッセージの数を取得
    pub fn info_count(&self) -> usize {
        self.count_by_severity(Severity::Info)
    }

    fn count_by_severity(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// JSON 形式でシリアライズ
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// 人間可読形式で出力
    pub fn to_simple_string(&self) -> String {
        let mut output = format!(
            "Validation Report: {}\n",
            if self.conforms { "CONFORMS" } else { "DOES NOT CONFORM" }
        );

        for (i, violation) in self.violations.iter().enumerate() {
            output.push_str(&format!("Result {}: {}\n", i + 1, violation.message));
            output.push_str(&format!("  Focus Node: {}\n", violation.focus_node));
            if let Some(path) = &violation.path {
                output.push_str(&format!("  Path: {}\n", path));
            }
            if let Some(value) = &violation.value {
                output.push_str(&format!("  Value: {}\n", value));
            }
            output.push_str(&format!("  Severity: {:?}\n", violation.severity));
            output.push('\n');
        }

        output
    }
}

/// 検証後の合否判定ポリシー。レポート自体は変更しない。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    pub fail_on_violation: bool,
    pub fail_on_warning: bool,
}

impl ValidationPolicy {
    /// 違反・警告の両方で否決する厳格ポリシー
    pub fn strict() -> Self {
        Self {
            fail_on_violation: true,
            fail_on_warning: true,
        }
    }

    /// 違反のみで否決する標準ポリシー
    pub fn fail_on_violations() -> Self {
        Self {
            fail_on_violation: true,
            fail_on_warning: false,
        }
    }
}
