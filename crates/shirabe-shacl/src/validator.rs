//! SHACL 制約検証

use crate::report::{ValidationPolicy, ValidationReport, Violation};
use crate::shapes::{NodeShape, PropertyShape, ShapesGraph};
use crate::{ShaclValidationError, ValidationError, ValidationPolicyError};
use shirabe_core::model::Term;
use shirabe_core::vocabulary;
use shirabe_store::store::TripleStore;
use tracing::{debug, info};

/// SHACL 検証エンジン
///
/// ステートレス: 呼び出しごとに (データ, 形状) からレポートへの変換。
#[derive(Debug, Default)]
pub struct ShaclValidator;

impl ShaclValidator {
    pub fn new() -> Self {
        Self
    }

    /// 形状グラフに対してデータグラフを検証する。
    ///
    /// フォーカスノードは `(X, rdf:type, targetClass)` の直接一致で
    /// 決定する。サブクラスのインスタンスを対象に含めるには、事前に
    /// 推論でクラス階層を実体化しておくこと。
    pub fn validate(
        &self,
        data: &TripleStore,
        shapes_store: &TripleStore,
    ) -> Result<ValidationReport, ShaclValidationError> {
        let shapes = ShapesGraph::from_store(shapes_store)?;
        let mut violations = Vec::new();

        for node_shape in shapes.node_shapes() {
            self.validate_node_shape(node_shape, &shapes, data, &mut violations);
        }

        let report = ValidationReport::new(violations, data.len());
        info!(
            conforms = report.conforms,
            violations = report.violations.len(),
            data_triples = report.data_graph_triple_count,
            "validation complete"
        );
        Ok(report)
    }

    /// 検証を実行し、ポリシーに照らして合否を判定する。
    ///
    /// レポート自体は変更されない。否決時の `ValidationPolicyError` は
    /// 完全なレポートを保持する。
    pub fn validate_with_policy(
        &self,
        data: &TripleStore,
        shapes_store: &TripleStore,
        policy: &ValidationPolicy,
    ) -> Result<ValidationReport, ValidationError> {
        let report = self.validate(data, shapes_store)?;

        let rejected = (policy.fail_on_violation && report.violation_count() > 0)
            || (policy.fail_on_warning && report.warning_count() > 0);
        if rejected {
            return Err(ValidationPolicyError::Rejected {
                report: Box::new(report),
            }
            .into());
        }
        Ok(report)
    }

    fn validate_node_shape(
        &self,
        node_shape: &NodeShape,
        shapes: &ShapesGraph,
        data: &TripleStore,
        violations: &mut Vec<Violation>,
    ) {
        let Some(target_class) = &node_shape.target_class else {
            debug!(shape = %node_shape.id, "node shape without sh:targetClass has no focus nodes");
            return;
        };

        let focus_nodes =
            data.subjects_matching(&vocabulary::rdf_type(), &Term::Iri(target_class.clone()));
        debug!(shape = %node_shape.id, focus_nodes = focus_nodes.len(), "checking node shape");

        for focus in focus_nodes {
            for ps_id in &node_shape.property_shapes {
                if let Some(property_shape) = shapes.property_shape(ps_id) {
                    self.check_property_shape(focus, property_shape, data, violations);
                }
            }
        }
    }

    fn check_property_shape(
        &self,
        focus: &Term,
        shape: &PropertyShape,
        data: &TripleStore,
        violations: &mut Vec<Violation>,
    ) {
        let values = data.objects_of(focus, &shape.path);

        if let Some(min) = shape.min_count {
            if (values.len() as u64) < min {
                violations.push(Violation {
                    focus_node: focus.clone(),
                    path: Some(shape.path.clone()),
                    value: None,
                    message: format!(
                        "missing required property: expected at least {} value(s) of {}, found {}",
                        min,
                        shape.path,
                        values.len()
                    ),
                    severity: shape.severity,
                });
            }
        }

        if let Some(max) = shape.max_count {
            if (values.len() as u64) > max {
                violations.push(Violation {
                    focus_node: focus.clone(),
                    path: Some(shape.path.clone()),
                    value: None,
                    message: format!(
                        "too many values: expected at most {} value(s) of {}, found {}",
                        max,
                        shape.path,
                        values.len()
                    ),
                    severity: shape.severity,
                });
            }
        }

        for value in values {
            if let Some(expected) = &shape.datatype {
                match value {
                    Term::Literal(lit) if &lit.effective_datatype() == expected => {}
                    Term::Literal(lit) => violations.push(Violation {
                        focus_node: focus.clone(),
                        path: Some(shape.path.clone()),
                        value: Some(value.clone()),
                        message: format!(
                            "datatype mismatch: expected {}, got {}",
                            expected,
                            lit.effective_datatype()
                        ),
                        severity: shape.severity,
                    }),
                    _ => violations.push(Violation {
                        focus_node: focus.clone(),
                        path: Some(shape.path.clone()),
                        value: Some(value.clone()),
                        message: format!("datatype mismatch: expected a literal of {}", expected),
                        severity: shape.severity,
                    }),
                }
            }

            if let Some(class) = &shape.class {
                let is_instance = value.is_resource()
                    && data.contains(&shirabe_core::model::Triple::new(
                        value.clone(),
                        vocabulary::rdf_type(),
                        Term::Iri(class.clone()),
                    ));
                if !is_instance {
                    violations.push(Violation {
                        focus_node: focus.clone(),
                        path: Some(shape.path.clone()),
                        value: Some(value.clone()),
                        message: format!("value is not an instance of {}", class),
                        severity: shape.severity,
                    });
                }
            }

            if let Some(kind) = shape.node_kind {
                if !kind.matches(value) {
                    violations.push(Violation {
                        focus_node: focus.clone(),
                        path: Some(shape.path.clone()),
                        value: Some(value.clone()),
                        message: format!("node kind mismatch: expected {:?}", kind),
                        severity: shape.severity,
                    });
                }
            }
        }
    }
}
