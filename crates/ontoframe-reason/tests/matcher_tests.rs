//! Matcher-family contract tests, run against every variant through the
//! common trait: the add/remove no-op contract, store-and-match behavior,
//! and the single-pair test.

use ontoframe_model::{ConceptDecl, FrameSchema, Identity, InstanceGraph, NodeId, PropertyDecl};
use ontoframe_owl::{Axiom, ClassExpression, Iri, Ontology, StructuralReasoner};
use ontoframe_reason::{
    ConceptMatcher, ExpressionMatcher, IndividualMatcher, InstanceMatcher, MonitorRegistry,
    ReasoningConfig,
};
use std::sync::Arc;

fn iri(s: &str) -> Iri {
    Iri::new(format!("http://ex.org/onto#{s}"))
}

fn id(s: &str) -> Identity {
    Identity::new(s)
}

fn schema() -> Arc<FrameSchema> {
    Arc::new(
        FrameSchema::builder()
            .concept(ConceptDecl::new("Patient").with_class(iri("Patient")))
            .concept(ConceptDecl::new("Disease").with_class(iri("Disease")))
            .concept(
                ConceptDecl::new("Diabetes")
                    .with_parent("Disease")
                    .with_class(iri("Diabetes")),
            )
            .concept(ConceptDecl::new("Allergy").with_class(iri("Allergy")))
            .property(PropertyDecl::object("hasCondition").with_property(iri("hasCondition")))
            .build()
            .unwrap(),
    )
}

fn ontology() -> Ontology {
    let mut ont = Ontology::new();
    for class in ["Patient", "Disease", "Diabetes", "Allergy"] {
        ont.declare_class(iri(class));
    }
    ont.declare_object_property(iri("hasCondition"));
    ont.add_axiom(Axiom::SubClassOf {
        sub: ClassExpression::Class(iri("Diabetes")),
        sup: ClassExpression::Class(iri("Disease")),
    });
    ont
}

/// `{type: Patient, hasCondition: {type: <condition>}}`
fn patient_with(condition: &str) -> (InstanceGraph, NodeId) {
    let mut graph = InstanceGraph::new();
    let patient = graph.add_atomic("Patient");
    let c = graph.add_atomic(condition);
    graph.add_link(patient, "hasCondition", c);
    (graph, patient)
}

fn variants() -> Vec<(&'static str, Box<dyn InstanceMatcher>)> {
    let monitors = Arc::new(MonitorRegistry::new());
    let config = ReasoningConfig::default();
    vec![
        (
            "expression",
            Box::new(
                ExpressionMatcher::new(
                    schema(),
                    StructuralReasoner::new(),
                    ontology(),
                    config.clone(),
                    monitors.clone(),
                )
                .unwrap(),
            ) as Box<dyn InstanceMatcher>,
        ),
        (
            "concept",
            Box::new(
                ConceptMatcher::new(
                    schema(),
                    StructuralReasoner::new(),
                    ontology(),
                    config.clone(),
                    monitors.clone(),
                )
                .unwrap(),
            ),
        ),
        (
            "individual",
            Box::new(
                IndividualMatcher::new(
                    schema(),
                    StructuralReasoner::new(),
                    ontology(),
                    config,
                    monitors,
                )
                .unwrap(),
            ),
        ),
    ]
}

#[test]
fn empty_store_matches_nothing() {
    let (query, query_root) = patient_with("Disease");
    for (name, matcher) in variants() {
        let hits = matcher.find_matches(&query, query_root).unwrap();
        assert!(hits.is_empty(), "{name}: empty store must match nothing");
    }
}

#[test]
fn duplicate_add_and_absent_remove_are_no_ops() {
    let (instance, root) = patient_with("Diabetes");
    for (name, matcher) in variants() {
        assert!(matcher.add(&instance, root, id("P1")).unwrap(), "{name}");
        assert!(
            !matcher.add(&instance, root, id("P1")).unwrap(),
            "{name}: duplicate add must answer false"
        );
        assert_eq!(matcher.stored_len(), 1, "{name}");

        assert!(!matcher.remove(&id("P2")), "{name}: absent remove");
        assert!(matcher.remove(&id("P1")), "{name}");
        assert!(!matcher.remove(&id("P1")), "{name}: second remove");
        assert_eq!(matcher.stored_len(), 0, "{name}");
    }
}

#[test]
fn stored_instance_matches_a_generalizing_query() {
    let (instance, instance_root) = patient_with("Diabetes");
    let (query, query_root) = patient_with("Disease");
    let (miss, miss_root) = patient_with("Allergy");

    for (name, matcher) in variants() {
        matcher.add(&instance, instance_root, id("P1")).unwrap();

        let hits = matcher.find_matches(&query, query_root).unwrap();
        assert_eq!(
            hits.into_iter().collect::<Vec<_>>(),
            vec![id("P1")],
            "{name}: Diabetes is a Disease"
        );

        let misses = matcher.find_matches(&miss, miss_root).unwrap();
        assert!(misses.is_empty(), "{name}: Allergy is not a Diabetes");
    }
}

#[test]
fn removal_evicts_the_stored_representation() {
    let (instance, instance_root) = patient_with("Diabetes");
    let (query, query_root) = patient_with("Disease");

    for (name, matcher) in variants() {
        matcher.add(&instance, instance_root, id("P1")).unwrap();
        assert!(matcher.remove(&id("P1")), "{name}");
        let hits = matcher.find_matches(&query, query_root).unwrap();
        assert!(hits.is_empty(), "{name}: removed instance must not match");
    }
}

#[test]
fn pair_test_persists_nothing() {
    let (instance, instance_root) = patient_with("Diabetes");
    let (query, query_root) = patient_with("Disease");
    let (other, other_root) = patient_with("Allergy");

    for (name, matcher) in variants() {
        assert!(
            matcher
                .matches(&query, query_root, &instance, instance_root)
                .unwrap(),
            "{name}"
        );
        assert!(
            !matcher
                .matches(&query, query_root, &other, other_root)
                .unwrap(),
            "{name}"
        );
        assert_eq!(matcher.stored_len(), 0, "{name}: pair test must not store");

        // The pair test leaves no residue that a later query could see.
        let hits = matcher.find_matches(&query, query_root).unwrap();
        assert!(hits.is_empty(), "{name}");
    }
}

#[test]
fn identical_identities_are_independent_across_variants() {
    let (instance, root) = patient_with("Diabetes");
    let matchers = variants();
    for (_, matcher) in &matchers {
        assert!(matcher.add(&instance, root, id("P1")).unwrap());
    }
    for (name, matcher) in &matchers {
        assert!(matcher.contains(&id("P1")), "{name}");
        assert_eq!(matcher.stored_len(), 1, "{name}");
    }
}
