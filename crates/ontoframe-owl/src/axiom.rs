//! Axioms and entity declarations.

use crate::expression::{ClassExpression, Literal};
use crate::iri::Iri;
use serde::{Deserialize, Serialize};

/// A declared entity in the ontology signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Class(Iri),
    ObjectProperty(Iri),
    DataProperty(Iri),
    NamedIndividual(Iri),
}

impl Entity {
    pub fn iri(&self) -> &Iri {
        match self {
            Entity::Class(iri)
            | Entity::ObjectProperty(iri)
            | Entity::DataProperty(iri)
            | Entity::NamedIndividual(iri) => iri,
        }
    }
}

/// The axiom forms the reasoning core produces and consumes.
///
/// This is not all of OWL 2 — it is exactly the surface the renderers emit
/// and the reasoner boundary checks for entailment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axiom {
    Declaration(Entity),
    SubClassOf {
        sub: ClassExpression,
        sup: ClassExpression,
    },
    EquivalentClasses(Vec<ClassExpression>),
    DisjointClasses(Vec<ClassExpression>),
    SubObjectPropertyOf {
        sub: Iri,
        sup: Iri,
    },
    SubDataPropertyOf {
        sub: Iri,
        sup: Iri,
    },
    ClassAssertion {
        class: ClassExpression,
        individual: Iri,
    },
    ObjectPropertyAssertion {
        property: Iri,
        subject: Iri,
        object: Iri,
    },
    DataPropertyAssertion {
        property: Iri,
        subject: Iri,
        literal: Literal,
    },
}
