//! Frame-graph → OWL renderers.
//!
//! The translation pipeline runs in two steps. First the [`EntityResolver`]
//! produces an ontology-compliant copy of the instance graph: every surviving
//! type, link, and feature has a usable OWL counterpart (ancestor types
//! substituted, unresolvable entities pruned). Then one of two renderers
//! turns the resolved graph into OWL constructs:
//!
//! - [`ExpressionRenderer`] — an anonymous class expression; defined only
//!   for acyclic graphs, fails fast on cycles
//! - [`IndividualRenderer`] — a named individual network plus assertion
//!   axioms, tracked as a retractable group; handles cycles and shared
//!   substructure
//!
//! Both renderers honor the same open/closed-world [`PropertySemantics`] and
//! the numeric rendering in [`number`].

pub mod expression;
pub mod individual;
pub mod number;
pub mod resolve;
pub mod semantics;

use ontoframe_model::{FrameSchema, Identity, ModelError, NodeTyping};
use ontoframe_owl::{ClassExpression, Iri};

pub use expression::{ExpressionRenderer, RenderedExpression};
pub use individual::{GroupStore, IndividualGroup, IndividualRenderer};
pub use resolve::{EntityResolver, ResolveError};
pub use semantics::{PropertySemantics, World};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cyclic description: concept expressions require an acyclic frame graph")]
    CyclicDescription,
    #[error("no OWL equivalent for {0}; the graph must be resolved before rendering")]
    MissingEquivalent(Identity),
    #[error("datatype {0} is not a frame-model numeric type")]
    UnknownDatatype(ontoframe_owl::Iri),
    #[error("construct does not encode a numeric value or range")]
    NotNumeric,
    #[error(transparent)]
    Number(#[from] ModelError),
}

/// Render a node's typing as a class expression, shared by both renderers.
///
/// Atomic types must have been resolved; a disjunction may still carry the
/// resolution-guarded singleton with no counterpart, which contributes no
/// constraint.
pub(crate) fn typing_expression(
    schema: &FrameSchema,
    typing: &NodeTyping,
) -> Result<ClassExpression, RenderError> {
    match typing {
        NodeTyping::Atomic(concept) => Ok(ClassExpression::Class(class_iri(schema, concept)?)),
        NodeTyping::Disjunction(disjuncts) => {
            let classes = disjuncts
                .iter()
                .map(|d| {
                    schema
                        .owl_class_of(d)
                        .cloned()
                        .map(ClassExpression::Class)
                        .unwrap_or(ClassExpression::Thing)
                })
                .collect();
            Ok(ClassExpression::union_of(classes))
        }
    }
}

pub(crate) fn class_iri(schema: &FrameSchema, concept: &Identity) -> Result<Iri, RenderError> {
    schema
        .owl_class_of(concept)
        .cloned()
        .ok_or_else(|| RenderError::MissingEquivalent(concept.clone()))
}

pub(crate) fn property_iri(schema: &FrameSchema, property: &Identity) -> Result<Iri, RenderError> {
    schema
        .owl_property_of(property)
        .cloned()
        .ok_or_else(|| RenderError::MissingEquivalent(property.clone()))
}
