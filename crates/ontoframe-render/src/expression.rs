//! Concept-expression rendering: a resolved frame-graph node becomes one
//! anonymous OWL class expression.
//!
//! Defined only for acyclic graphs. The in-progress node stack is threaded
//! through the recursion as an explicit parameter, so one renderer value is
//! safe to share across threads and a revisited node is detected exactly
//! when it is still being rendered (diamond sharing below an acyclic node is
//! fine; a true cycle is not).
//!
//! Declaring a reference individual emits a transient declaration axiom.
//! The renderer never touches the ontology itself — the caller adds the
//! transients before reasoning and retracts them afterwards.

use crate::semantics::{PropertySemantics, World};
use crate::{number, property_iri, typing_expression, RenderError};
use ontoframe_model::{FrameSchema, Identity, InstanceGraph, NodeId};
use ontoframe_owl::{Axiom, ClassExpression, Entity, Iri, Ontology};

/// A rendered expression plus its rendering side effects.
#[derive(Debug, Clone)]
pub struct RenderedExpression {
    pub expression: ClassExpression,
    /// The frame-graph node this expression was rendered from.
    pub source: NodeId,
    /// Declarations for reference individuals, to be added for the duration
    /// of one reasoning operation and retracted by the caller.
    pub transient_axioms: Vec<Axiom>,
}

pub struct ExpressionRenderer<'a> {
    schema: &'a FrameSchema,
    ontology: &'a Ontology,
    semantics: &'a PropertySemantics,
    reference_namespace: &'a str,
}

impl<'a> ExpressionRenderer<'a> {
    pub fn new(
        schema: &'a FrameSchema,
        ontology: &'a Ontology,
        semantics: &'a PropertySemantics,
        reference_namespace: &'a str,
    ) -> Self {
        Self {
            schema,
            ontology,
            semantics,
            reference_namespace,
        }
    }

    pub fn render(
        &self,
        graph: &InstanceGraph,
        root: NodeId,
    ) -> Result<RenderedExpression, RenderError> {
        let mut stack = Vec::new();
        let mut transient_axioms = Vec::new();
        let expression = self.render_node(graph, root, &mut stack, &mut transient_axioms)?;
        Ok(RenderedExpression {
            expression,
            source: root,
            transient_axioms,
        })
    }

    fn render_node(
        &self,
        graph: &InstanceGraph,
        id: NodeId,
        stack: &mut Vec<NodeId>,
        transient_axioms: &mut Vec<Axiom>,
    ) -> Result<ClassExpression, RenderError> {
        let node = graph.node(id);

        if let Some(reference) = &node.reference {
            let individual = self.reference_iri(reference);
            transient_axioms.push(Axiom::Declaration(Entity::NamedIndividual(
                individual.clone(),
            )));
            return Ok(ClassExpression::ObjectOneOf(vec![individual]));
        }

        if stack.contains(&id) {
            return Err(RenderError::CyclicDescription);
        }
        stack.push(id);
        let result = self.render_description(graph, id, stack, transient_axioms);
        stack.pop();
        result
    }

    fn render_description(
        &self,
        graph: &InstanceGraph,
        id: NodeId,
        stack: &mut Vec<NodeId>,
        transient_axioms: &mut Vec<Axiom>,
    ) -> Result<ClassExpression, RenderError> {
        let node = graph.node(id);
        let mut parts = vec![typing_expression(self.schema, &node.typing)?];

        for link in &node.links {
            let property = property_iri(self.schema, &link.property)?;
            let world = self.semantics.world_of(self.ontology, &property);
            let mut fillers = Vec::with_capacity(link.values.len());
            for &value in &link.values {
                let filler = self.render_node(graph, value, stack, transient_axioms)?;
                parts.push(restriction_for(&property, &filler));
                fillers.push(filler);
            }
            if world == World::Closed && !fillers.is_empty() {
                parts.push(ClassExpression::ObjectAllValuesFrom {
                    property,
                    filler: Box::new(ClassExpression::union_of(fillers)),
                });
            }
        }

        for feature in &node.features {
            let Some(value) = feature.first_value() else {
                continue;
            };
            let property = property_iri(self.schema, &feature.property)?;
            let world = self.semantics.world_of(self.ontology, &property);
            parts.push(number::render_some(&property, value));
            if world == World::Closed {
                parts.push(number::render_all(&property, value));
            }
        }

        Ok(ClassExpression::intersection_of(parts))
    }

    fn reference_iri(&self, reference: &Identity) -> Iri {
        Iri::in_namespace(self.reference_namespace, reference.as_str())
    }
}

/// Existential restriction over a rendered filler, with nominal fillers
/// collapsing to has-value form.
fn restriction_for(property: &Iri, filler: &ClassExpression) -> ClassExpression {
    match filler {
        ClassExpression::ObjectOneOf(individuals) if individuals.len() == 1 => {
            ClassExpression::ObjectHasValue {
                property: property.clone(),
                individual: individuals[0].clone(),
            }
        }
        _ => ClassExpression::ObjectSomeValuesFrom {
            property: property.clone(),
            filler: Box::new(filler.clone()),
        },
    }
}
