//! 不動点反復による RDFS 推論

use crate::config::{ReasonerConfig, RuleName, RULE_CATALOG};
use crate::ReasoningError;
use serde::Serialize;
use shirabe_core::model::{Iri, Term, Triple};
use shirabe_core::vocabulary;
use shirabe_store::provenance::Provenance;
use shirabe_store::store::TripleStore;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// 推論 1 回分の結果レポート
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningResult {
    /// 追加された推論トリプル数
    pub inferred_triple_count: usize,
    /// 1 つ以上のトリプルを導出した規則 (カタログ順)
    pub rules_applied: Vec<RuleName>,
    /// 実行時間 (ミリ秒)
    pub duration_ms: u64,
    /// 反復上限に達する前に不動点へ到達したか
    pub reached_fixed_point: bool,
}

/// RDFS 推論エンジン
///
/// ステートレス: 呼び出しごとに (ストア, 設定) から結果への単発の変換。
/// 同一ストアへの並行する `reason` 呼び出しの排他は呼び出し側の責任。
#[derive(Debug, Default)]
pub struct RdfsReasoner;

impl RdfsReasoner {
    pub fn new() -> Self {
        Self
    }

    /// ストアを直接変更して推論トリプルを実体化する。
    ///
    /// 各反復で有効な規則をカタログ順に評価し、新規トリプルをまとめて
    /// 反復の最後に追加する (collect-then-apply)。新規トリプルが
    /// 出なくなるか `max_iterations` に達した時点で停止する。
    pub fn reason(
        &self,
        store: &mut TripleStore,
        config: &ReasonerConfig,
    ) -> Result<ReasoningResult, ReasoningError> {
        let started = Instant::now();
        let mut rules_fired: BTreeSet<RuleName> = BTreeSet::new();
        let mut inferred_total = 0usize;
        let mut reached_fixed_point = false;

        for iteration in 1..=config.max_iterations() {
            let mut staged: HashSet<Triple> = HashSet::new();
            let mut additions: Vec<(RuleName, Triple)> = Vec::new();

            for rule in RULE_CATALOG.iter().filter(|r| config.is_active(**r)) {
                for triple in apply_rule(*rule, store) {
                    if !store.contains(&triple) && staged.insert(triple.clone()) {
                        additions.push((*rule, triple));
                    }
                }
            }

            if additions.is_empty() {
                reached_fixed_point = true;
                debug!(iteration, "fixed point reached");
                break;
            }

            debug!(iteration, new_triples = additions.len(), "materializing inferred triples");
            for (rule, triple) in additions {
                rules_fired.insert(rule);
                store.insert(
                    triple,
                    Provenance::Inferred {
                        rule: rule.as_str().to_string(),
                    },
                );
                inferred_total += 1;
            }
        }

        if !reached_fixed_point {
            warn!(
                max_iterations = config.max_iterations(),
                "iteration cap reached before fixed point; materialization may be incomplete"
            );
        }

        let result = ReasoningResult {
            inferred_triple_count: inferred_total,
            rules_applied: RULE_CATALOG
                .iter()
                .copied()
                .filter(|rule| rules_fired.contains(rule))
                .collect(),
            duration_ms: started.elapsed().as_millis() as u64,
            reached_fixed_point,
        };
        info!(
            inferred = result.inferred_triple_count,
            fixed_point = result.reached_fixed_point,
            duration_ms = result.duration_ms,
            "reasoning complete"
        );
        Ok(result)
    }

    /// 入力ストアのクローン上で推論し、元のストアには触れない。
    pub fn reason_copy(
        &self,
        store: &TripleStore,
        config: &ReasonerConfig,
    ) -> Result<(TripleStore, ReasoningResult), ReasoningError> {
        let mut copy = store.clone();
        let result = self.reason(&mut copy, config)?;
        Ok((copy, result))
    }

    /// SHACL 検証前の最小推論。設定を省略した場合はクラス階層のみ
    /// (subClassOf 推移 + type 継承) を実体化する。
    pub fn reason_for_validation(
        &self,
        store: &mut TripleStore,
        config: Option<&ReasonerConfig>,
    ) -> Result<ReasoningResult, ReasoningError> {
        let default = ReasonerConfig::subclass_only();
        self.reason(store, config.unwrap_or(&default))
    }

    /// 推論が 1 つ以上のトリプルを追加するかどうかの非破壊チェック
    pub fn would_infer(
        &self,
        store: &TripleStore,
        config: &ReasonerConfig,
    ) -> Result<bool, ReasoningError> {
        let (_, result) = self.reason_copy(store, config)?;
        Ok(result.inferred_triple_count > 0)
    }
}

/// 1 規則をストア全体に適用し、導出候補を返す。
/// 既存トリプルとの重複除去は呼び出し側が行う。
fn apply_rule(rule: RuleName, store: &TripleStore) -> Vec<Triple> {
    match rule {
        RuleName::SubClassOfTransitivity => transitive_closure_step(store, &vocabulary::rdfs_subclass_of()),
        RuleName::SubPropertyOfTransitivity => {
            transitive_closure_step(store, &vocabulary::rdfs_subproperty_of())
        }
        RuleName::TypeInheritance => type_inheritance(store),
        RuleName::DomainInference => domain_inference(store),
        RuleName::RangeInference => range_inference(store),
        RuleName::SubPropertyOfInheritance => subproperty_inheritance(store),
    }
}

/// (a, pred, b), (b, pred, c) => (a, pred, c)
fn transitive_closure_step(store: &TripleStore, predicate: &Iri) -> Vec<Triple> {
    let links = store.find_triples(None, Some(predicate), None);
    let mut parents: HashMap<&Term, Vec<&Term>> = HashMap::new();
    for stored in &links {
        parents
            .entry(&stored.triple.subject)
            .or_default()
            .push(&stored.triple.object);
    }

    let mut derived = Vec::new();
    for stored in &links {
        let a = &stored.triple.subject;
        if let Some(grandparents) = parents.get(&stored.triple.object) {
            for c in grandparents {
                // 自己参照は導出しない
                if *c != a {
                    derived.push(Triple::new(a.clone(), predicate.clone(), (*c).clone()));
                }
            }
        }
    }
    derived
}

/// (x, rdf:type, a), (a, rdfs:subClassOf, b) => (x, rdf:type, b)
fn type_inheritance(store: &TripleStore) -> Vec<Triple> {
    let subclass_of = vocabulary::rdfs_subclass_of();
    let rdf_type = vocabulary::rdf_type();

    let mut superclasses: HashMap<&Term, Vec<&Term>> = HashMap::new();
    for stored in store.find_triples(None, Some(&subclass_of), None) {
        superclasses
            .entry(&stored.triple.subject)
            .or_default()
            .push(&stored.triple.object);
    }

    let mut derived = Vec::new();
    for stored in store.find_triples(None, Some(&rdf_type), None) {
        if let Some(supers) = superclasses.get(&stored.triple.object) {
            for class in supers {
                if *class != &stored.triple.object {
                    derived.push(Triple::new(
                        stored.triple.subject.clone(),
                        rdf_type.clone(),
                        (*class).clone(),
                    ));
                }
            }
        }
    }
    derived
}

/// (p, rdfs:domain, d) を持つ p について、(x, p, y) => (x, rdf:type, d)
fn domain_inference(store: &TripleStore) -> Vec<Triple> {
    let rdf_type = vocabulary::rdf_type();
    let mut derived = Vec::new();

    for (property, class) in property_constraints(store, &vocabulary::rdfs_domain()) {
        for usage in store.find_triples(None, Some(&property), None) {
            derived.push(Triple::new(
                usage.triple.subject.clone(),
                rdf_type.clone(),
                class.clone(),
            ));
        }
    }
    derived
}

/// (p, rdfs:range, r) を持つ p について、(x, p, y) => (y, rdf:type, r)
/// y がリテラルの場合は導出しない。
fn range_inference(store: &TripleStore) -> Vec<Triple> {
    let rdf_type = vocabulary::rdf_type();
    let mut derived = Vec::new();

    for (property, class) in property_constraints(store, &vocabulary::rdfs_range()) {
        for usage in store.find_triples(None, Some(&property), None) {
            if usage.triple.object.is_literal() {
                continue;
            }
            derived.push(Triple::new(
                usage.triple.object.clone(),
                rdf_type.clone(),
                class.clone(),
            ));
        }
    }
    derived
}

/// (p, rdfs:subPropertyOf, q) を持つ p について、(x, p, y) => (x, q, y)
fn subproperty_inheritance(store: &TripleStore) -> Vec<Triple> {
    let mut derived = Vec::new();

    for (property, parent) in property_constraints(store, &vocabulary::rdfs_subproperty_of()) {
        // 述語になれるのは IRI のみ
        let Term::Iri(parent_iri) = parent else {
            continue;
        };
        if parent_iri == property {
            continue;
        }
        for usage in store.find_triples(None, Some(&property), None) {
            derived.push(Triple::new(
                usage.triple.subject.clone(),
                parent_iri.clone(),
                usage.triple.object.clone(),
            ));
        }
    }
    derived
}

/// (p, constraint_predicate, v) 形式のスキーマトリプルを
/// (述語 IRI, 値) の組として列挙する。主語が IRI でないものは無視。
fn property_constraints(store: &TripleStore, constraint_predicate: &Iri) -> Vec<(Iri, Term)> {
    store
        .find_triples(None, Some(constraint_predicate), None)
        .into_iter()
        .filter_map(|stored| {
            stored
                .triple
                .subject
                .as_iri()
                .map(|p| (p.clone(), stored.triple.object.clone()))
        })
        .collect()
}
