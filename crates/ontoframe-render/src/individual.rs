//! Individual-network rendering: a resolved frame-graph node becomes a named
//! root individual plus the assertion axioms describing its network.
//!
//! Object slot values assert directly as property assertions between named
//! individuals, which is what lets this renderer represent the cyclic
//! structures the expression renderer must reject. Every axiom produced for
//! one root is collected into an [`IndividualGroup`] so the whole network can
//! be retracted atomically later.
//!
//! Naming: the root keeps the caller-supplied IRI; every other individual
//! generated in the same pass derives from the root IRI with a monotonically
//! incrementing suffix. The per-pass memo makes rendering idempotent per
//! node — diamond-shared substructure yields one individual, and a repeat
//! render of the same logical group reproduces the same names.

use crate::semantics::{PropertySemantics, World};
use crate::{number, property_iri, typing_expression, RenderError};
use ahash::AHashMap;
use ontoframe_model::{FrameSchema, InstanceGraph, NodeId, NumberValue};
use ontoframe_owl::{Axiom, ClassExpression, Entity, Iri, Ontology};

/// A rendered network: root individual plus everything asserted for it.
#[derive(Debug, Clone)]
pub struct IndividualGroup {
    pub root: Iri,
    pub axioms: Vec<Axiom>,
}

pub struct IndividualRenderer<'a> {
    schema: &'a FrameSchema,
    ontology: &'a Ontology,
    semantics: &'a PropertySemantics,
    reference_namespace: &'a str,
}

struct RenderPass {
    memo: AHashMap<NodeId, Iri>,
    next_suffix: u32,
    axioms: Vec<Axiom>,
}

impl<'a> IndividualRenderer<'a> {
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
        root_iri: Iri,
    ) -> Result<IndividualGroup, RenderError> {
        let mut pass = RenderPass {
            memo: AHashMap::new(),
            next_suffix: 1,
            axioms: Vec::new(),
        };
        let rendered_root = self.render_node(graph, root, &root_iri, &mut pass)?;
        Ok(IndividualGroup {
            root: rendered_root,
            axioms: pass.axioms,
        })
    }

    fn render_node(
        &self,
        graph: &InstanceGraph,
        id: NodeId,
        root_iri: &Iri,
        pass: &mut RenderPass,
    ) -> Result<Iri, RenderError> {
        if let Some(existing) = pass.memo.get(&id) {
            return Ok(existing.clone());
        }
        let node = graph.node(id);

        // Reference nodes reuse the referenced individual's IRI: no new
        // individual, no declaration, no descent.
        if let Some(reference) = &node.reference {
            let iri = Iri::in_namespace(self.reference_namespace, reference.as_str());
            pass.memo.insert(id, iri.clone());
            return Ok(iri);
        }

        let iri = if pass.memo.is_empty() {
            root_iri.clone()
        } else {
            let generated = root_iri.with_suffix(&format!("-n{}", pass.next_suffix));
            pass.next_suffix += 1;
            generated
        };
        pass.memo.insert(id, iri.clone());

        pass.axioms
            .push(Axiom::Declaration(Entity::NamedIndividual(iri.clone())));
        pass.axioms.push(Axiom::ClassAssertion {
            class: typing_expression(self.schema, &node.typing)?,
            individual: iri.clone(),
        });

        for link in &node.links {
            let property = property_iri(self.schema, &link.property)?;
            let world = self.semantics.world_of(self.ontology, &property);
            let mut value_iris = Vec::with_capacity(link.values.len());
            for &value in &link.values {
                let value_iri = self.render_node(graph, value, root_iri, pass)?;
                pass.axioms.push(Axiom::ObjectPropertyAssertion {
                    property: property.clone(),
                    subject: iri.clone(),
                    object: value_iri.clone(),
                });
                value_iris.push(value_iri);
            }
            if world == World::Closed && !value_iris.is_empty() {
                pass.axioms.push(Axiom::ClassAssertion {
                    class: ClassExpression::ObjectAllValuesFrom {
                        property,
                        filler: Box::new(ClassExpression::ObjectOneOf(value_iris)),
                    },
                    individual: iri.clone(),
                });
            }
        }

        for feature in &node.features {
            let Some(value) = feature.first_value() else {
                continue;
            };
            let property = property_iri(self.schema, &feature.property)?;
            let world = self.semantics.world_of(self.ontology, &property);
            match value {
                NumberValue::Exact(v) => pass.axioms.push(Axiom::DataPropertyAssertion {
                    property: property.clone(),
                    subject: iri.clone(),
                    literal: number::literal(v),
                }),
                NumberValue::Range(_) => pass.axioms.push(Axiom::ClassAssertion {
                    class: number::render_some(&property, value),
                    individual: iri.clone(),
                }),
            }
            if world == World::Closed {
                pass.axioms.push(Axiom::ClassAssertion {
                    class: number::render_all(&property, value),
                    individual: iri.clone(),
                });
            }
        }

        Ok(iri)
    }

}

// ============================================================================
// Group lifecycle
// ============================================================================

/// Tracks rendered groups by root IRI so a stored instance's whole network
/// can be retracted atomically.
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: AHashMap<Iri, Vec<Axiom>>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a group's axioms to the ontology and remember them under the
    /// group's root. Answers false (changing nothing) if the root is
    /// already registered.
    pub fn insert(&mut self, ontology: &mut Ontology, group: IndividualGroup) -> bool {
        if self.groups.contains_key(&group.root) {
            return false;
        }
        ontology.add_axioms(group.axioms.iter().cloned());
        self.groups.insert(group.root, group.axioms);
        true
    }

    /// Retract exactly the axioms registered under `root` and forget the
    /// mapping. Answers false if the root is unknown.
    pub fn remove(&mut self, ontology: &mut Ontology, root: &Iri) -> bool {
        let Some(axioms) = self.groups.remove(root) else {
            return false;
        };
        tracing::debug!(root = %root, axioms = axioms.len(), "retracting individual group");
        ontology.remove_axioms(&axioms);
        true
    }

    pub fn contains(&self, root: &Iri) -> bool {
        self.groups.contains_key(root)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Iri> {
        self.groups.keys()
    }
}
