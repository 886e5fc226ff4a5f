//! Store-boundary serialization: instance graphs round-trip through JSON
//! exactly, since the external store persists them as-is.

use ontoframe_model::{InstanceGraph, NumberRange, NumberValue, NumericKind, TypedNumber};

#[test]
fn instance_graph_round_trips_through_json() {
    let mut graph = InstanceGraph::new();
    let patient = graph.add_atomic("Patient");
    let condition = graph.add_disjunction(["Diabetes", "Allergy"]);
    let record = graph.add_atomic("Record");
    graph.set_reference(record, "R77");
    graph.add_link(patient, "hasCondition", condition);
    graph.add_link(patient, "hasRecord", record);
    graph.add_feature(patient, "age", NumberValue::Exact(TypedNumber::Integer(41)));
    graph.add_feature(
        condition,
        "severity",
        NumberValue::Range(
            NumberRange::new(
                NumericKind::Double,
                Some(TypedNumber::Double(0.5)),
                None,
            )
            .unwrap(),
        ),
    );

    let json = serde_json::to_string(&graph).unwrap();
    let back: InstanceGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(graph, back);
}

#[test]
fn node_ids_serialize_as_plain_indices() {
    let mut graph = InstanceGraph::new();
    let a = graph.add_atomic("A");
    let b = graph.add_atomic("B");
    graph.add_link(a, "p", b);

    let json = serde_json::to_value(&graph).unwrap();
    let values = json["nodes"][0]["links"][0]["values"].clone();
    assert_eq!(values, serde_json::json!([1]));
}
