//! OWL construct model and reasoner boundary for Ontoframe.
//!
//! This crate sits *below* the frame model: it knows nothing about frames,
//! slots, or instance graphs. It provides:
//!
//! - IRIs and the small vocabulary the renderers need (`iri`)
//! - literals, facet-restricted data ranges, and anonymous class
//!   expressions (`expression`)
//! - axioms and entity declarations (`axiom`)
//! - an in-memory ontology: signature, told hierarchies, and an exact
//!   add/remove axiom store (`ontology`)
//! - the DL-reasoner boundary trait plus a told/structural reference
//!   implementation (`reasoner`)
//!
//! The structural reasoner is deliberately incomplete as a description-logic
//! engine: it answers from told axioms, class definitions, and asserted
//! individual networks. Deployments needing full DL semantics plug an
//! external reasoner in behind [`DlReasoner`].

pub mod axiom;
pub mod expression;
pub mod iri;
pub mod ontology;
pub mod reasoner;

pub use axiom::{Axiom, Entity};
pub use expression::{ClassExpression, DataRange, Facet, FacetRestriction, Literal};
pub use iri::Iri;
pub use ontology::Ontology;
pub use reasoner::{DlReasoner, ReasonerError, StructuralReasoner};
