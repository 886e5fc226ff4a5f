//! Renderer contract tests: cycle detection on the expression path, group
//! naming stability on the individual path, and the has-value/only-values
//! duality under closed-world semantics.

use ontoframe_model::{
    ConceptDecl, FrameSchema, InstanceGraph, NodeId, NumberValue, PropertyDecl, TypedNumber,
};
use ontoframe_owl::{Axiom, ClassExpression, Entity, Iri, Ontology};
use ontoframe_render::{
    ExpressionRenderer, GroupStore, IndividualRenderer, PropertySemantics, RenderError, World,
};

const INSTANCES: &str = "http://ex.org/instances#";

fn iri(s: &str) -> Iri {
    Iri::new(format!("http://ex.org/onto#{s}"))
}

fn schema() -> FrameSchema {
    FrameSchema::builder()
        .concept(ConceptDecl::new("Person").with_class(iri("Person")))
        .concept(ConceptDecl::new("Task").with_class(iri("Task")))
        .property(PropertyDecl::object("knows").with_property(iri("knows")))
        .property(PropertyDecl::object("assigned").with_property(iri("assigned")))
        .property(PropertyDecl::data("age").with_property(iri("age")))
        .build()
        .unwrap()
}

fn ontology() -> Ontology {
    let mut ont = Ontology::new();
    ont.declare_class(iri("Person"));
    ont.declare_class(iri("Task"));
    ont.declare_object_property(iri("knows"));
    ont.declare_object_property(iri("assigned"));
    ont.declare_data_property(iri("age"));
    ont
}

fn cyclic_graph() -> (InstanceGraph, NodeId) {
    let mut graph = InstanceGraph::new();
    let a = graph.add_atomic("Person");
    let b = graph.add_atomic("Person");
    graph.add_link(a, "knows", b);
    graph.add_link(b, "knows", a);
    (graph, a)
}

#[test]
fn cyclic_graph_fails_expression_rendering_but_not_individual_rendering() {
    let schema = schema();
    let ont = ontology();
    let semantics = PropertySemantics::new(World::Open);
    let (graph, root) = cyclic_graph();

    let expressions = ExpressionRenderer::new(&schema, &ont, &semantics, INSTANCES);
    assert!(matches!(
        expressions.render(&graph, root),
        Err(RenderError::CyclicDescription)
    ));

    let individuals = IndividualRenderer::new(&schema, &ont, &semantics, INSTANCES);
    let group = individuals
        .render(&graph, root, Iri::in_namespace(INSTANCES, "a"))
        .unwrap();
    // Two declarations, two type assertions, two property assertions.
    assert_eq!(group.axioms.len(), 6);
    let back_edge = group.axioms.iter().any(|axiom| {
        matches!(axiom, Axiom::ObjectPropertyAssertion { object, .. } if *object == group.root)
    });
    assert!(back_edge, "the cycle must close back onto the root");
}

#[test]
fn diamond_sharing_renders_one_individual_per_node() {
    let schema = schema();
    let ont = ontology();
    let semantics = PropertySemantics::new(World::Open);

    let mut graph = InstanceGraph::new();
    let top = graph.add_atomic("Person");
    let left = graph.add_atomic("Person");
    let right = graph.add_atomic("Person");
    let shared = graph.add_atomic("Task");
    graph.add_link(top, "knows", left);
    graph.add_link(top, "knows", right);
    graph.add_link(left, "assigned", shared);
    graph.add_link(right, "assigned", shared);

    let renderer = IndividualRenderer::new(&schema, &ont, &semantics, INSTANCES);
    let group = renderer
        .render(&graph, top, Iri::in_namespace(INSTANCES, "top"))
        .unwrap();

    let declared: Vec<&Iri> = group
        .axioms
        .iter()
        .filter_map(|axiom| match axiom {
            Axiom::Declaration(Entity::NamedIndividual(iri)) => Some(iri),
            _ => None,
        })
        .collect();
    assert_eq!(declared.len(), 4, "shared node must not be duplicated");
    let unique: std::collections::BTreeSet<_> = declared.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn repeat_rendering_reproduces_the_same_names() {
    let schema = schema();
    let ont = ontology();
    let semantics = PropertySemantics::new(World::Open);
    let (graph, root) = cyclic_graph();

    let renderer = IndividualRenderer::new(&schema, &ont, &semantics, INSTANCES);
    let root_iri = Iri::in_namespace(INSTANCES, "a");
    let first = renderer.render(&graph, root, root_iri.clone()).unwrap();
    let second = renderer.render(&graph, root, root_iri).unwrap();
    assert_eq!(first.axioms, second.axioms);
}

#[test]
fn different_roots_never_collide_on_generated_names() {
    let schema = schema();
    let ont = ontology();
    let semantics = PropertySemantics::new(World::Open);
    let (graph, root) = cyclic_graph();

    let renderer = IndividualRenderer::new(&schema, &ont, &semantics, INSTANCES);
    let first = renderer
        .render(&graph, root, Iri::in_namespace(INSTANCES, "g1"))
        .unwrap();
    let second = renderer
        .render(&graph, root, Iri::in_namespace(INSTANCES, "g2"))
        .unwrap();

    let names = |group: &ontoframe_render::IndividualGroup| {
        group
            .axioms
            .iter()
            .filter_map(|axiom| match axiom {
                Axiom::Declaration(Entity::NamedIndividual(iri)) => Some(iri.clone()),
                _ => None,
            })
            .collect::<std::collections::BTreeSet<_>>()
    };
    assert!(names(&first).is_disjoint(&names(&second)));
}

#[test]
fn closed_world_link_adds_a_universal_closure() {
    let schema = schema();
    let ont = ontology();
    let closed = PropertySemantics::with_exceptions(World::Open, vec![iri("assigned")]);

    let mut graph = InstanceGraph::new();
    let person = graph.add_atomic("Person");
    let task = graph.add_atomic("Task");
    graph.add_link(person, "assigned", task);

    let renderer = ExpressionRenderer::new(&schema, &ont, &closed, INSTANCES);
    let rendered = renderer.render(&graph, person).unwrap();

    let ClassExpression::ObjectIntersectionOf(parts) = &rendered.expression else {
        panic!("expected an intersection");
    };
    assert!(parts.iter().any(|p| matches!(
        p,
        ClassExpression::ObjectSomeValuesFrom { property, .. } if *property == iri("assigned")
    )));
    assert!(parts.iter().any(|p| matches!(
        p,
        ClassExpression::ObjectAllValuesFrom { property, .. } if *property == iri("assigned")
    )));

    // Open-world rendering of the same graph has no closure conjunct.
    let open = PropertySemantics::new(World::Open);
    let renderer = ExpressionRenderer::new(&schema, &ont, &open, INSTANCES);
    let rendered = renderer.render(&graph, person).unwrap();
    let closure = match &rendered.expression {
        ClassExpression::ObjectIntersectionOf(parts) => parts
            .iter()
            .any(|p| matches!(p, ClassExpression::ObjectAllValuesFrom { .. })),
        _ => false,
    };
    assert!(!closure);
}

#[test]
fn reference_nodes_render_as_nominals_with_transient_declarations() {
    let schema = schema();
    let ont = ontology();
    let semantics = PropertySemantics::new(World::Open);

    let mut graph = InstanceGraph::new();
    let person = graph.add_atomic("Person");
    let stored = graph.add_atomic("Task");
    graph.set_reference(stored, "T42");
    graph.add_link(person, "assigned", stored);

    let renderer = ExpressionRenderer::new(&schema, &ont, &semantics, INSTANCES);
    let rendered = renderer.render(&graph, person).unwrap();

    let expected = Iri::in_namespace(INSTANCES, "T42");
    assert_eq!(
        rendered.transient_axioms,
        vec![Axiom::Declaration(Entity::NamedIndividual(expected.clone()))]
    );
    let ClassExpression::ObjectIntersectionOf(parts) = &rendered.expression else {
        panic!("expected an intersection");
    };
    assert!(parts.iter().any(|p| matches!(
        p,
        ClassExpression::ObjectHasValue { individual, .. } if *individual == expected
    )));
}

#[test]
fn reference_nodes_reuse_their_iri_in_individual_networks() {
    let schema = schema();
    let ont = ontology();
    let semantics = PropertySemantics::new(World::Open);

    let mut graph = InstanceGraph::new();
    let person = graph.add_atomic("Person");
    let stored = graph.add_atomic("Task");
    graph.set_reference(stored, "T42");
    graph.add_link(person, "assigned", stored);

    let renderer = IndividualRenderer::new(&schema, &ont, &semantics, INSTANCES);
    let group = renderer
        .render(&graph, person, Iri::in_namespace(INSTANCES, "p"))
        .unwrap();

    let expected = Iri::in_namespace(INSTANCES, "T42");
    // The referenced individual is asserted against, never declared or typed.
    assert!(group.axioms.iter().any(|axiom| matches!(
        axiom,
        Axiom::ObjectPropertyAssertion { object, .. } if *object == expected
    )));
    assert!(!group.axioms.iter().any(|axiom| matches!(
        axiom,
        Axiom::Declaration(Entity::NamedIndividual(iri)) if *iri == expected
    )));
}

#[test]
fn features_render_existentially_and_close_under_closed_world() {
    let schema = schema();
    let ont = ontology();
    let closed = PropertySemantics::with_exceptions(World::Open, vec![iri("age")]);

    let mut graph = InstanceGraph::new();
    let person = graph.add_atomic("Person");
    graph.add_feature(person, "age", NumberValue::Exact(TypedNumber::Integer(30)));

    let renderer = ExpressionRenderer::new(&schema, &ont, &closed, INSTANCES);
    let rendered = renderer.render(&graph, person).unwrap();
    let ClassExpression::ObjectIntersectionOf(parts) = &rendered.expression else {
        panic!("expected an intersection");
    };
    assert!(parts
        .iter()
        .any(|p| matches!(p, ClassExpression::DataHasValue { .. })));
    assert!(parts
        .iter()
        .any(|p| matches!(p, ClassExpression::DataAllValuesFrom { .. })));
}

#[test]
fn group_store_inserts_and_retracts_exact_axiom_sets() {
    let schema = schema();
    let mut ont = ontology();
    let semantics = PropertySemantics::new(World::Open);
    let (graph, root) = cyclic_graph();

    let group = {
        let renderer = IndividualRenderer::new(&schema, &ont, &semantics, INSTANCES);
        renderer
            .render(&graph, root, Iri::in_namespace(INSTANCES, "a"))
            .unwrap()
    };
    let root_iri = group.root.clone();
    let baseline = ont.axiom_count();

    let mut store = GroupStore::new();
    assert!(store.insert(&mut ont, group.clone()));
    assert!(!store.insert(&mut ont, group));
    assert!(ont.axiom_count() > baseline);
    assert!(ont.contains_individual(&root_iri));

    assert!(store.remove(&mut ont, &root_iri));
    assert_eq!(ont.axiom_count(), baseline);
    assert!(!ont.contains_individual(&root_iri));
    assert!(!store.remove(&mut ont, &root_iri));
}
