//! SHACL 形状グラフの読み込み
//!
//! 形状グラフ (トリプルの集合) を NodeShape / PropertyShape 構造体へ
//! パースする。形状 ID は IRI のみ対応。

use crate::report::Severity;
use crate::ShaclValidationError;
use shirabe_core::model::{Iri, Term};
use shirabe_core::vocabulary;
use shirabe_store::store::TripleStore;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Node Shape: クラスを対象とした制約のまとまり
#[derive(Debug, Clone)]
pub struct NodeShape {
    pub id: Iri,
    /// 検証対象クラス。欠落した形状はフォーカスノードを持たない。
    pub target_class: Option<Iri>,
    /// 参照される Property Shape の ID
    pub property_shapes: Vec<Iri>,
}

/// Property Shape: 1 つのプロパティパスに対する制約
#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub id: Iri,
    pub path: Iri,
    pub min_count: Option<u64>,
    pub max_count: Option<u64>,
    pub datatype: Option<Iri>,
    pub class: Option<Iri>,
    pub node_kind: Option<NodeKind>,
    pub severity: Severity,
}

/// Node Kind constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Iri,
    BlankNode,
    Literal,
}

impl NodeKind {
    fn from_iri(iri: &Iri) -> Option<Self> {
        match iri.as_str() {
            vocabulary::SH_IRI => Some(NodeKind::Iri),
            vocabulary::SH_BLANK_NODE => Some(NodeKind::BlankNode),
            vocabulary::SH_LITERAL => Some(NodeKind::Literal),
            _ => None,
        }
    }

    pub fn matches(&self, term: &Term) -> bool {
        matches!(
            (self, term),
            (NodeKind::Iri, Term::Iri(_))
                | (NodeKind::BlankNode, Term::BlankNode(_))
                | (NodeKind::Literal, Term::Literal(_))
        )
    }
}

/// Shapes Graph
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    node_shapes: Vec<NodeShape>,
    property_shapes: HashMap<Iri, PropertyShape>,
}

impl ShapesGraph {
    /// 形状トリプルのストアから ShapesGraph を構築する。
    ///
    /// `sh:path` を欠く Property Shape は `MissingPath` で失敗する。
    /// 形状 ID が IRI でないトリプルは無視される。
    pub fn from_store(store: &TripleStore) -> Result<Self, ShaclValidationError> {
        let rdf_type = vocabulary::rdf_type();

        // NodeShape の ID を収集 (宣言順を保つ)
        let mut node_ids: Vec<Iri> = Vec::new();
        let mut seen_nodes: HashSet<Iri> = HashSet::new();
        for stored in store.find_triples(None, Some(&rdf_type), Some(&Term::iri(vocabulary::SH_NODE_SHAPE))) {
            match stored.triple.subject.as_iri() {
                Some(id) => {
                    if seen_nodes.insert(id.clone()) {
                        node_ids.push(id.clone());
                    }
                }
                None => debug!(subject = %stored.triple.subject, "ignoring non-IRI node shape"),
            }
        }
        for stored in store.find_triples(None, Some(&vocabulary::sh_target_class()), None) {
            if let Some(id) = stored.triple.subject.as_iri() {
                if seen_nodes.insert(id.clone()) {
                    node_ids.push(id.clone());
                }
            }
        }

        let mut node_shapes = Vec::new();
        let mut property_ids: Vec<Iri> = Vec::new();
        let mut seen_properties: HashSet<Iri> = HashSet::new();

        for id in node_ids {
            let subject = Term::Iri(id.clone());

            let target_class = match store
                .objects_of(&subject, &vocabulary::sh_target_class())
                .first()
            {
                Some(Term::Iri(class)) => Some((*class).clone()),
                Some(other) => {
                    return Err(ShaclValidationError::MalformedConstraint {
                        shape: id,
                        detail: format!("sh:targetClass must be an IRI, got {}", other),
                    })
                }
                None => None,
            };

            let mut refs = Vec::new();
            for object in store.objects_of(&subject, &vocabulary::sh_property()) {
                match object.as_iri() {
                    Some(ps_id) => {
                        refs.push(ps_id.clone());
                        if seen_properties.insert(ps_id.clone()) {
                            property_ids.push(ps_id.clone());
                        }
                    }
                    None => {
                        return Err(ShaclValidationError::MalformedConstraint {
                            shape: id,
                            detail: format!("sh:property must reference an IRI, got {}", object),
                        })
                    }
                }
            }

            node_shapes.push(NodeShape {
                id,
                target_class,
                property_shapes: refs,
            });
        }

        // 独立に宣言された PropertyShape も取り込む
        for stored in store.find_triples(None, Some(&rdf_type), Some(&Term::iri(vocabulary::SH_PROPERTY_SHAPE))) {
            if let Some(id) = stored.triple.subject.as_iri() {
                if seen_properties.insert(id.clone()) {
                    property_ids.push(id.clone());
                }
            }
        }

        let mut property_shapes = HashMap::new();
        for id in property_ids {
            let shape = Self::parse_property_shape(store, id)?;
            property_shapes.insert(shape.id.clone(), shape);
        }

        Ok(Self {
            node_shapes,
            property_shapes,
        })
    }

    fn parse_property_shape(
        store: &TripleStore,
        id: Iri,
    ) -> Result<PropertyShape, ShaclValidationError> {
        let subject = Term::Iri(id.clone());

        let path = match store.objects_of(&subject, &vocabulary::sh_path()).first() {
            Some(Term::Iri(path)) => (*path).clone(),
            Some(other) => {
                return Err(ShaclValidationError::MalformedConstraint {
                    shape: id,
                    detail: format!("sh:path must be an IRI, got {}", other),
                })
            }
            None => return Err(ShaclValidationError::MissingPath(id)),
        };

        let min_count = Self::parse_count(store, &subject, &id, &vocabulary::sh_min_count())?;
        let max_count = Self::parse_count(store, &subject, &id, &vocabulary::sh_max_count())?;
        let datatype = Self::parse_iri_constraint(store, &subject, &id, &vocabulary::sh_datatype())?;
        let class = Self::parse_iri_constraint(store, &subject, &id, &vocabulary::sh_class())?;

        let node_kind = match Self::parse_iri_constraint(store, &subject, &id, &vocabulary::sh_node_kind())? {
            Some(kind_iri) => Some(NodeKind::from_iri(&kind_iri).ok_or_else(|| {
                ShaclValidationError::MalformedConstraint {
                    shape: id.clone(),
                    detail: format!("unknown sh:nodeKind {}", kind_iri),
                }
            })?),
            None => None,
        };

        let severity = match Self::parse_iri_constraint(store, &subject, &id, &vocabulary::sh_severity())? {
            Some(severity_iri) => Severity::from_iri(&severity_iri).ok_or_else(|| {
                ShaclValidationError::MalformedConstraint {
                    shape: id.clone(),
                    detail: format!("unknown sh:severity {}", severity_iri),
                }
            })?,
            None => Severity::default(),
        };

        Ok(PropertyShape {
            id,
            path,
            min_count,
            max_count,
            datatype,
            class,
            node_kind,
            severity,
        })
    }

    fn parse_count(
        store: &TripleStore,
        subject: &Term,
        shape: &Iri,
        predicate: &Iri,
    ) -> Result<Option<u64>, ShaclValidationError> {
        match store.objects_of(subject, predicate).first() {
            Some(Term::Literal(lit)) => {
                lit.value
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|_| ShaclValidationError::MalformedConstraint {
                        shape: shape.clone(),
                        detail: format!("{} must be a non-negative integer, got \"{}\"", predicate, lit.value),
                    })
            }
            Some(other) => Err(ShaclValidationError::MalformedConstraint {
                shape: shape.clone(),
                detail: format!("{} must be a literal, got {}", predicate, other),
            }),
            None => Ok(None),
        }
    }

    fn parse_iri_constraint(
        store: &TripleStore,
        subject: &Term,
        shape: &Iri,
        predicate: &Iri,
    ) -> Result<Option<Iri>, ShaclValidationError> {
        match store.objects_of(subject, predicate).first() {
            Some(Term::Iri(iri)) => Ok(Some((*iri).clone())),
            Some(other) => Err(ShaclValidationError::MalformedConstraint {
                shape: shape.clone(),
                detail: format!("{} must be an IRI, got {}", predicate, other),
            }),
            None => Ok(None),
        }
    }

    pub fn node_shapes(&self) -> &[NodeShape] {
        &self.node_shapes
    }

    pub fn property_shape(&self, id: &Iri) -> Option<&PropertyShape> {
        self.property_shapes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.node_shapes.is_empty() && self.property_shapes.is_empty()
    }
}
