use shirabe_core::model::{Iri, Literal, Term, Triple};
use shirabe_core::vocabulary;
use shirabe_rdfs::RdfsReasoner;
use shirabe_shacl::{
    generate_shapes_from_ontology, ShapesGraph, ShaclValidator, Severity, ValidationError,
    ValidationPolicy,
};
use shirabe_store::provenance::Provenance;
use shirabe_store::store::TripleStore;

fn asserted() -> Provenance {
    Provenance::asserted("test")
}

fn iri_triple(s: &str, p: Iri, o: &str) -> Triple {
    Triple::new(Term::iri(s), p, Term::iri(o))
}

/// Person / Organization と worksFor (functional, domain=Person, range=Organization),
/// name (datatype property, domain=Person, range=xsd:string) のオントロジー
fn company_ontology() -> TripleStore {
    let mut onto = TripleStore::new();
    onto.insert(
        iri_triple("http://example.org/Person", vocabulary::rdf_type(), vocabulary::OWL_CLASS),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/Organization", vocabulary::rdf_type(), vocabulary::OWL_CLASS),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/worksFor", vocabulary::rdf_type(), vocabulary::OWL_OBJECT_PROPERTY),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/worksFor", vocabulary::rdf_type(), vocabulary::OWL_FUNCTIONAL_PROPERTY),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/worksFor", vocabulary::rdfs_domain(), "http://example.org/Person"),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/worksFor", vocabulary::rdfs_range(), "http://example.org/Organization"),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/name", vocabulary::rdf_type(), vocabulary::OWL_DATATYPE_PROPERTY),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/name", vocabulary::rdfs_domain(), "http://example.org/Person"),
        asserted(),
    );
    onto.insert(
        iri_triple("http://example.org/name", vocabulary::rdfs_range(), vocabulary::XSD_STRING),
        asserted(),
    );
    onto
}

// ---------------------------------------------------------------------------
// Shape generation
// ---------------------------------------------------------------------------

#[test]
fn test_generator_emits_one_node_shape_per_class() {
    let shapes_store = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let shapes = ShapesGraph::from_store(&shapes_store).unwrap();

    let targets: Vec<&str> = shapes
        .node_shapes()
        .iter()
        .filter_map(|ns| ns.target_class.as_ref().map(|c| c.as_str()))
        .collect();
    assert_eq!(targets.len(), 2);
    assert!(targets.contains(&"http://example.org/Person"));
    assert!(targets.contains(&"http://example.org/Organization"));
}

#[test]
fn test_generator_constraints_from_property_declarations() {
    let shapes_store = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let shapes = ShapesGraph::from_store(&shapes_store).unwrap();

    let person_shape = shapes
        .node_shapes()
        .iter()
        .find(|ns| ns.target_class.as_ref().map(Iri::as_str) == Some("http://example.org/Person"))
        .unwrap();
    assert_eq!(person_shape.property_shapes.len(), 2);

    let works_for = person_shape
        .property_shapes
        .iter()
        .filter_map(|id| shapes.property_shape(id))
        .find(|ps| ps.path.as_str() == "http://example.org/worksFor")
        .expect("worksFor property shape");

    // functional -> maxCount 1, object range -> sh:class
    assert_eq!(works_for.max_count, Some(1));
    assert_eq!(works_for.min_count, None, "functional does not imply required");
    assert_eq!(works_for.class.as_ref().map(Iri::as_str), Some("http://example.org/Organization"));
    assert_eq!(works_for.datatype, None);

    let name = person_shape
        .property_shapes
        .iter()
        .filter_map(|id| shapes.property_shape(id))
        .find(|ps| ps.path.as_str() == "http://example.org/name")
        .expect("name property shape");

    // datatype range -> sh:datatype, not functional -> no maxCount
    assert_eq!(name.datatype.as_ref().map(Iri::as_str), Some(vocabulary::XSD_STRING));
    assert_eq!(name.class, None);
    assert_eq!(name.max_count, None);
    assert_eq!(name.min_count, None);
}

#[test]
fn test_generator_skips_property_without_domain() {
    let mut onto = company_ontology();
    onto.insert(
        iri_triple("http://example.org/floating", vocabulary::rdf_type(), vocabulary::OWL_OBJECT_PROPERTY),
        asserted(),
    );

    let shapes_store = generate_shapes_from_ontology(&onto).unwrap();
    let shapes = ShapesGraph::from_store(&shapes_store).unwrap();

    let all_paths: Vec<String> = shapes
        .node_shapes()
        .iter()
        .flat_map(|ns| &ns.property_shapes)
        .filter_map(|id| shapes.property_shape(id))
        .map(|ps| ps.path.as_str().to_string())
        .collect();
    assert!(!all_paths.contains(&"http://example.org/floating".to_string()));
}

#[test]
fn test_generator_class_without_properties() {
    let mut onto = TripleStore::new();
    onto.insert(
        iri_triple("http://example.org/Tag", vocabulary::rdf_type(), vocabulary::OWL_CLASS),
        asserted(),
    );

    let shapes_store = generate_shapes_from_ontology(&onto).unwrap();
    let shapes = ShapesGraph::from_store(&shapes_store).unwrap();

    assert_eq!(shapes.node_shapes().len(), 1);
    assert!(shapes.node_shapes()[0].property_shapes.is_empty());
}

#[test]
fn test_generator_rejects_literal_class_declaration() {
    let mut onto = TripleStore::new();
    onto.insert(
        Triple::new(
            Literal::string("not-a-class"),
            vocabulary::rdf_type(),
            Term::iri(vocabulary::OWL_CLASS),
        ),
        asserted(),
    );

    assert!(generate_shapes_from_ontology(&onto).is_err());
}

#[test]
fn test_generated_shapes_are_deterministic() {
    let a = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let b = generate_shapes_from_ontology(&company_ontology()).unwrap();

    assert_eq!(a.len(), b.len());
    for stored in a.iter() {
        assert!(b.contains(&stored.triple));
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_conforming_data() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    data.insert(
        iri_triple("http://example.org/acme", vocabulary::rdf_type(), "http://example.org/Organization"),
        asserted(),
    );
    data.insert(
        iri_triple("http://example.org/alice", Iri::new("http://example.org/worksFor"), "http://example.org/acme"),
        asserted(),
    );
    data.insert(
        Triple::new(
            Term::iri("http://example.org/alice"),
            Iri::new("http://example.org/name"),
            Literal::string("Alice"),
        ),
        asserted(),
    );

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert!(report.conforms, "unexpected violations: {}", report.to_simple_string());
    assert_eq!(report.data_graph_triple_count, data.len());
}

#[test]
fn test_max_count_violation() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    for org in ["http://example.org/acme", "http://example.org/globex"] {
        data.insert(
            iri_triple(org, vocabulary::rdf_type(), "http://example.org/Organization"),
            asserted(),
        );
        data.insert(
            iri_triple("http://example.org/alice", Iri::new("http://example.org/worksFor"), org),
            asserted(),
        );
    }

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert!(!report.conforms);
    assert_eq!(report.violation_count(), 1);

    let violation = &report.violations[0];
    assert_eq!(violation.focus_node, Term::iri("http://example.org/alice"));
    assert_eq!(violation.path.as_ref().map(Iri::as_str), Some("http://example.org/worksFor"));
    assert!(violation.message.contains("too many values"));
}

#[test]
fn test_datatype_violation() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    data.insert(
        Triple::new(
            Term::iri("http://example.org/alice"),
            Iri::new("http://example.org/name"),
            Literal::integer(42),
        ),
        asserted(),
    );

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert_eq!(report.violation_count(), 1);
    assert!(report.violations[0].message.contains("datatype mismatch"));
}

#[test]
fn test_plain_literal_counts_as_xsd_string() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    // datatype を明示しないリテラル
    data.insert(
        Triple::new(
            Term::iri("http://example.org/alice"),
            Iri::new("http://example.org/name"),
            Literal::string("Alice"),
        ),
        asserted(),
    );

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert!(report.conforms);
}

#[test]
fn test_class_constraint_violation() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    // acme は Organization として宣言されていない
    data.insert(
        iri_triple("http://example.org/alice", Iri::new("http://example.org/worksFor"), "http://example.org/acme"),
        asserted(),
    );

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert_eq!(report.violation_count(), 1);
    assert!(report.violations[0].message.contains("not an instance of"));
}

#[test]
fn test_validation_is_deterministic() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    data.insert(
        iri_triple("http://example.org/alice", Iri::new("http://example.org/worksFor"), "http://example.org/acme"),
        asserted(),
    );

    let validator = ShaclValidator::new();
    let first = validator.validate(&data, &shapes).unwrap();
    let second = validator.validate(&data, &shapes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_min_count_from_hand_written_shape() {
    // 生成器は minCount を出さないので、手書きの形状で必須制約を検証する
    let mut shapes = TripleStore::new();
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::rdf_type(), vocabulary::SH_NODE_SHAPE),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_target_class(), "http://example.org/Person"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_property(), "http://example.org/NameShape"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/NameShape", vocabulary::sh_path(), "http://example.org/name"),
        asserted(),
    );
    shapes.insert(
        Triple::new(
            Term::iri("http://example.org/NameShape"),
            vocabulary::sh_min_count(),
            Literal::integer(1),
        ),
        asserted(),
    );

    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert_eq!(report.violation_count(), 1);
    assert!(report.violations[0].message.contains("missing required property"));
}

#[test]
fn test_custom_severity_is_reported() {
    let mut shapes = TripleStore::new();
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_target_class(), "http://example.org/Person"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_property(), "http://example.org/NameShape"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/NameShape", vocabulary::sh_path(), "http://example.org/name"),
        asserted(),
    );
    shapes.insert(
        Triple::new(
            Term::iri("http://example.org/NameShape"),
            vocabulary::sh_min_count(),
            Literal::integer(1),
        ),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/NameShape", vocabulary::sh_severity(), vocabulary::SH_WARNING),
        asserted(),
    );

    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert!(!report.conforms, "conforms is severity-agnostic");
    assert_eq!(report.violation_count(), 0);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.violations[0].severity, Severity::Warning);
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

fn warning_report_fixture() -> (TripleStore, TripleStore) {
    let mut shapes = TripleStore::new();
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_target_class(), "http://example.org/Person"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_property(), "http://example.org/NameShape"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/NameShape", vocabulary::sh_path(), "http://example.org/name"),
        asserted(),
    );
    shapes.insert(
        Triple::new(
            Term::iri("http://example.org/NameShape"),
            vocabulary::sh_min_count(),
            Literal::integer(1),
        ),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/NameShape", vocabulary::sh_severity(), vocabulary::SH_WARNING),
        asserted(),
    );

    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    (data, shapes)
}

#[test]
fn test_permissive_policy_never_rejects() {
    let (data, shapes) = warning_report_fixture();
    let policy = ValidationPolicy::default();

    let report = ShaclValidator::new()
        .validate_with_policy(&data, &shapes, &policy)
        .unwrap();
    assert!(!report.conforms);
}

#[test]
fn test_fail_on_violation_ignores_warnings() {
    let (data, shapes) = warning_report_fixture();
    let policy = ValidationPolicy::fail_on_violations();

    // レポートは警告のみなので合格
    let report = ShaclValidator::new()
        .validate_with_policy(&data, &shapes, &policy)
        .unwrap();
    assert_eq!(report.warning_count(), 1);
}

#[test]
fn test_strict_policy_rejects_warnings_with_full_report() {
    let (data, shapes) = warning_report_fixture();
    let policy = ValidationPolicy::strict();

    let err = ShaclValidator::new()
        .validate_with_policy(&data, &shapes, &policy)
        .unwrap_err();
    match err {
        ValidationError::Policy(policy_err) => {
            assert_eq!(policy_err.report().warning_count(), 1);
        }
        other => panic!("expected policy error, got {:?}", other),
    }
}

#[test]
fn test_fail_on_violation_rejects_violations() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );
    data.insert(
        iri_triple("http://example.org/alice", Iri::new("http://example.org/worksFor"), "http://example.org/acme"),
        asserted(),
    );

    let result = ShaclValidator::new().validate_with_policy(
        &data,
        &shapes,
        &ValidationPolicy::fail_on_violations(),
    );
    assert!(matches!(result, Err(ValidationError::Policy(_))));
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

/// functional は必須を意味しない: worksFor を持たない Person は適合する
#[test]
fn test_functional_property_absent_is_conforming() {
    let shapes = generate_shapes_from_ontology(&company_ontology()).unwrap();
    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/alice", vocabulary::rdf_type(), "http://example.org/Person"),
        asserted(),
    );

    let report = ShaclValidator::new().validate(&data, &shapes).unwrap();
    assert!(report.conforms, "no minCount is generated, absence is not a violation");
}

/// サブクラスのインスタンスは推論後にのみフォーカスノードになる
#[test]
fn test_reasoning_gated_validation() {
    let mut shapes = TripleStore::new();
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_target_class(), "http://example.org/Person"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/PersonShape", vocabulary::sh_property(), "http://example.org/NameShape"),
        asserted(),
    );
    shapes.insert(
        iri_triple("http://example.org/NameShape", vocabulary::sh_path(), "http://example.org/name"),
        asserted(),
    );
    shapes.insert(
        Triple::new(
            Term::iri("http://example.org/NameShape"),
            vocabulary::sh_min_count(),
            Literal::integer(1),
        ),
        asserted(),
    );

    let mut data = TripleStore::new();
    data.insert(
        iri_triple("http://example.org/Manager", vocabulary::rdfs_subclass_of(), "http://example.org/Person"),
        asserted(),
    );
    data.insert(
        iri_triple("http://example.org/bob", vocabulary::rdf_type(), "http://example.org/Manager"),
        asserted(),
    );

    let validator = ShaclValidator::new();

    // 推論なし: bob は Person として見つからず、チェックも行われない
    let report = validator.validate(&data, &shapes).unwrap();
    assert!(report.conforms);
    assert!(report.violations.is_empty());

    // 推論あり: bob が Person になり、name 欠落が検出される
    RdfsReasoner::new().reason_for_validation(&mut data, None).unwrap();
    let report = validator.validate(&data, &shapes).unwrap();
    assert_eq!(report.violation_count(), 1);
    assert_eq!(report.violations[0].focus_node, Term::iri("http://example.org/bob"));
}
