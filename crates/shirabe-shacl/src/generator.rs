//! オントロジーからの SHACL 形状生成
//!
//! OWL のクラス・プロパティ宣言から NodeShape / PropertyShape を導出する。
//! 出力は形状トリプルの入った新しいストア。
//!
//! 生成規則:
//! - `(C, rdf:type, owl:Class)` ごとに `sh:targetClass C` の NodeShape
//! - `rdfs:domain D` を持つプロパティは D の NodeShape 配下の PropertyShape
//! - `owl:FunctionalProperty` は `sh:maxCount 1`
//! - `rdfs:range` がデータ型なら `sh:datatype`、そうでなければ `sh:class`
//!
//! ドメインを持たないプロパティは配置先が決まらないため出力されない。
//! `sh:minCount` は生成しない (関数型プロパティは必須を意味しない)。

use crate::ValidationReportError;
use shirabe_core::model::{Iri, Literal, Term, Triple};
use shirabe_core::vocabulary;
use shirabe_store::provenance::Provenance;
use shirabe_store::store::TripleStore;
use std::collections::HashSet;
use tracing::debug;

/// 生成された形状トリプルの由来タグ
const GENERATOR_SOURCE: &str = "shape-generator";

/// オントロジーストアから形状ストアを生成する
pub fn generate_shapes_from_ontology(
    ontology: &TripleStore,
) -> Result<TripleStore, ValidationReportError> {
    let rdf_type = vocabulary::rdf_type();
    let mut shapes = TripleStore::new();
    let provenance = Provenance::asserted(GENERATOR_SOURCE);

    // クラス宣言 -> NodeShape
    let classes = declared_iris(ontology, vocabulary::OWL_CLASS)
        .map_err(ValidationReportError::InvalidClassDeclaration)?;
    for class in &classes {
        let shape_id = node_shape_iri(class);
        shapes.insert(
            Triple::new(shape_id.clone(), rdf_type.clone(), Term::iri(vocabulary::SH_NODE_SHAPE)),
            provenance.clone(),
        );
        shapes.insert(
            Triple::new(shape_id, vocabulary::sh_target_class(), Term::Iri(class.clone())),
            provenance.clone(),
        );
    }

    // プロパティ宣言 -> ドメインクラス配下の PropertyShape
    let mut properties = declared_iris(ontology, vocabulary::OWL_OBJECT_PROPERTY)
        .map_err(ValidationReportError::InvalidPropertyDeclaration)?;
    let datatype_properties = declared_iris(ontology, vocabulary::OWL_DATATYPE_PROPERTY)
        .map_err(ValidationReportError::InvalidPropertyDeclaration)?;
    for property in datatype_properties {
        if !properties.contains(&property) {
            properties.push(property);
        }
    }

    let class_set: HashSet<&Iri> = classes.iter().collect();
    for property in &properties {
        let subject = Term::Iri(property.clone());

        let Some(Term::Iri(domain)) = ontology
            .objects_of(&subject, &vocabulary::rdfs_domain())
            .first()
            .copied()
        else {
            debug!(property = %property, "skipping property without rdfs:domain");
            continue;
        };
        if !class_set.contains(domain) {
            debug!(property = %property, domain = %domain, "skipping property whose domain is not a declared class");
            continue;
        }

        let prop_shape_id = property_shape_iri(domain, property);
        shapes.insert(
            Triple::new(
                prop_shape_id.clone(),
                rdf_type.clone(),
                Term::iri(vocabulary::SH_PROPERTY_SHAPE),
            ),
            provenance.clone(),
        );
        shapes.insert(
            Triple::new(
                node_shape_iri(domain),
                vocabulary::sh_property(),
                Term::Iri(prop_shape_id.clone()),
            ),
            provenance.clone(),
        );
        shapes.insert(
            Triple::new(
                prop_shape_id.clone(),
                vocabulary::sh_path(),
                Term::Iri(property.clone()),
            ),
            provenance.clone(),
        );

        // 関数型プロパティは値を高々 1 つに制限する
        let functional = Triple::new(
            subject.clone(),
            rdf_type.clone(),
            Term::iri(vocabulary::OWL_FUNCTIONAL_PROPERTY),
        );
        if ontology.contains(&functional) {
            shapes.insert(
                Triple::new(
                    prop_shape_id.clone(),
                    vocabulary::sh_max_count(),
                    Literal::integer(1),
                ),
                provenance.clone(),
            );
        }

        // レンジから型制約を導出
        if let Some(Term::Iri(range)) = ontology
            .objects_of(&subject, &vocabulary::rdfs_range())
            .first()
            .copied()
        {
            let constraint = if vocabulary::is_datatype_iri(range) {
                vocabulary::sh_datatype()
            } else {
                vocabulary::sh_class()
            };
            shapes.insert(
                Triple::new(prop_shape_id, constraint, Term::Iri(range.clone())),
                provenance.clone(),
            );
        }
    }

    Ok(shapes)
}

/// クラスの NodeShape ID を決定的に生成する
fn node_shape_iri(class: &Iri) -> Iri {
    Iri::new(format!("urn:shirabe:shape:{}", class.as_str()))
}

/// プロパティの PropertyShape ID を決定的に生成する
fn property_shape_iri(domain: &Iri, property: &Iri) -> Iri {
    Iri::new(format!(
        "urn:shirabe:shape:{}:{}",
        domain.as_str(),
        property.as_str()
    ))
}

/// `(s, rdf:type, class_iri)` の主語を宣言順で列挙する。
/// 主語が IRI でなければ Err (表示文字列を返す)。
fn declared_iris(store: &TripleStore, class_iri: &str) -> Result<Vec<Iri>, String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for subject in store.subjects_matching(&vocabulary::rdf_type(), &Term::iri(class_iri)) {
        match subject.as_iri() {
            Some(iri) => {
                if seen.insert(iri.clone()) {
                    out.push(iri.clone());
                }
            }
            None => return Err(subject.to_string()),
        }
    }
    Ok(out)
}
