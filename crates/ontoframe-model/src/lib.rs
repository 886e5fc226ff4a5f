//! Frame-model boundary for Ontoframe.
//!
//! The reasoning core never *builds* the concept/property hierarchy — an
//! external build pipeline supplies it. This crate is that boundary, made
//! explicit:
//!
//! - `schema`: concept and property declarations with parents and optional
//!   OWL equivalents, assembled through [`SchemaBuilder`] (a static
//!   declaration API — no reflection anywhere)
//! - `instance`: instance-level frame graphs as an arena of nodes with
//!   object-valued links and numeric features; graphs may be cyclic
//! - `number`: typed numeric values and ranges carried by features
//!
//! Everything here is plain data with serde support, since instance graphs
//! are what the external store persists and feeds back for matching.

pub mod instance;
pub mod number;
pub mod schema;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use instance::{Feature, InstanceGraph, InstanceNode, Link, NodeId, NodeTyping};
pub use number::{NumberRange, NumberValue, NumericKind, TypedNumber};
pub use schema::{ConceptDecl, FrameSchema, PropertyDecl, PropertyKind, SchemaBuilder};

/// Stable external identifier for frame-model entities and stored instances.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Identity::new(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("duplicate concept declaration: {0}")]
    DuplicateConcept(Identity),
    #[error("duplicate property declaration: {0}")]
    DuplicateProperty(Identity),
    #[error("unknown parent {parent} declared on {child}")]
    UnknownParent { child: Identity, parent: Identity },
    #[error("number {lexical:?} does not parse as {kind:?}")]
    NumberParse { lexical: String, kind: NumericKind },
    #[error("range bounds disagree on numeric kind")]
    RangeKindMismatch,
    #[error("range lower bound exceeds upper bound")]
    InvalidRange,
}
