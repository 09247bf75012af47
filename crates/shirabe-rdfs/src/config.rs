//! 推論規則カタログと推論設定

use crate::RuleParseError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

/// 推論規則の名前 (固定カタログ)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RuleName {
    /// (A subClassOf B), (B subClassOf C) => (A subClassOf C)
    #[serde(rename = "subClassOf-transitivity")]
    SubClassOfTransitivity,
    /// (P subPropertyOf Q), (Q subPropertyOf R) => (P subPropertyOf R)
    #[serde(rename = "subPropertyOf-transitivity")]
    SubPropertyOfTransitivity,
    /// (X type A), (A subClassOf B) => (X type B)
    #[serde(rename = "type-inheritance")]
    TypeInheritance,
    /// (X P Y), (P domain D) => (X type D)
    #[serde(rename = "domain-inference")]
    DomainInference,
    /// (X P Y), (P range R) => (Y type R)  -- Y がリソースの場合のみ
    #[serde(rename = "range-inference")]
    RangeInference,
    /// (X P Y), (P subPropertyOf Q) => (X Q Y)
    #[serde(rename = "subPropertyOf-inheritance")]
    SubPropertyOfInheritance,
}

/// カタログ順 = 規則の評価順
pub const RULE_CATALOG: [RuleName; 6] = [
    RuleName::SubClassOfTransitivity,
    RuleName::SubPropertyOfTransitivity,
    RuleName::TypeInheritance,
    RuleName::DomainInference,
    RuleName::RangeInference,
    RuleName::SubPropertyOfInheritance,
];

impl RuleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::SubClassOfTransitivity => "subClassOf-transitivity",
            RuleName::SubPropertyOfTransitivity => "subPropertyOf-transitivity",
            RuleName::TypeInheritance => "type-inheritance",
            RuleName::DomainInference => "domain-inference",
            RuleName::RangeInference => "range-inference",
            RuleName::SubPropertyOfInheritance => "subPropertyOf-inheritance",
        }
    }
}

impl std::fmt::Display for RuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleName {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RULE_CATALOG
            .iter()
            .find(|rule| rule.as_str() == s)
            .copied()
            .ok_or_else(|| RuleParseError::UnknownRule(s.to_string()))
    }
}

/// 推論の設定: 有効な規則の集合と反復上限
///
/// 構築時に検証される不変条件:
/// - 規則集合は空でない
/// - `max_iterations >= 1` (循環するクラス階層でも停止を保証)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonerConfig {
    rules: BTreeSet<RuleName>,
    max_iterations: usize,
}

impl ReasonerConfig {
    /// 全 RDFS 規則を有効にしたプリセット
    pub fn rdfs() -> Self {
        Self {
            rules: RULE_CATALOG.iter().copied().collect(),
            max_iterations: 10,
        }
    }

    /// クラス階層のみのプリセット (subClassOf 推移 + type 継承)
    pub fn subclass_only() -> Self {
        Self {
            rules: [RuleName::SubClassOfTransitivity, RuleName::TypeInheritance]
                .into_iter()
                .collect(),
            max_iterations: 10,
        }
    }

    /// 任意の規則集合からの構築
    pub fn custom<I>(rules: I, max_iterations: usize) -> Result<Self, RuleParseError>
    where
        I: IntoIterator<Item = RuleName>,
    {
        let rules: BTreeSet<RuleName> = rules.into_iter().collect();
        if rules.is_empty() {
            return Err(RuleParseError::EmptyRuleSet);
        }
        if max_iterations < 1 {
            return Err(RuleParseError::InvalidIterationCap(max_iterations));
        }
        Ok(Self {
            rules,
            max_iterations,
        })
    }

    /// 規則名の文字列からの構築
    pub fn from_names(names: &[&str], max_iterations: usize) -> Result<Self, RuleParseError> {
        let rules = names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<RuleName>, _>>()?;
        Self::custom(rules, max_iterations)
    }

    pub fn rules(&self) -> &BTreeSet<RuleName> {
        &self.rules
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn is_active(&self, rule: RuleName) -> bool {
        self.rules.contains(&rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdfs_preset_enables_all_rules() {
        let config = ReasonerConfig::rdfs();
        assert_eq!(config.rules().len(), RULE_CATALOG.len());
        assert_eq!(config.max_iterations(), 10);
    }

    #[test]
    fn test_subclass_only_preset() {
        let config = ReasonerConfig::subclass_only();
        assert!(config.is_active(RuleName::SubClassOfTransitivity));
        assert!(config.is_active(RuleName::TypeInheritance));
        assert!(!config.is_active(RuleName::DomainInference));
    }

    #[test]
    fn test_empty_rule_set_rejected() {
        let result = ReasonerConfig::custom([], 10);
        assert_eq!(result.unwrap_err(), RuleParseError::EmptyRuleSet);
    }

    #[test]
    fn test_zero_iteration_cap_rejected() {
        let result = ReasonerConfig::custom([RuleName::TypeInheritance], 0);
        assert_eq!(result.unwrap_err(), RuleParseError::InvalidIterationCap(0));
    }

    #[test]
    fn test_unknown_rule_name_rejected() {
        let result = ReasonerConfig::from_names(&["type-inheritance", "owl-sameAs"], 10);
        assert_eq!(
            result.unwrap_err(),
            RuleParseError::UnknownRule("owl-sameAs".to_string())
        );
    }

    #[test]
    fn test_rule_name_round_trip() {
        for rule in RULE_CATALOG {
            let parsed: RuleName = rule.as_str().parse().unwrap();
            assert_eq!(parsed, rule);
        }
    }
}
