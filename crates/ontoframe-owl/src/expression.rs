//! Literals, data ranges, and anonymous class expressions.
//!
//! These are the ephemeral constructs the renderers produce: a rendered
//! frame-graph node becomes a [`ClassExpression`], numeric slot values become
//! [`Literal`]s or facet-restricted [`DataRange`]s. Nothing here is tied to a
//! particular ontology; expressions only reference entities by IRI.

use crate::iri::Iri;
use serde::{Deserialize, Serialize};

// ============================================================================
// Literals
// ============================================================================

/// A typed literal: lexical form plus datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Iri,
}

impl Literal {
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }

    /// Numeric view of the lexical form, if it parses.
    pub fn numeric_value(&self) -> Option<f64> {
        self.lexical.parse::<f64>().ok()
    }
}

// ============================================================================
// Data ranges
// ============================================================================

/// Constraining facet on a datatype restriction.
///
/// Bounds are inclusive on both ends; an absent bound is simply an absent
/// facet on the restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facet {
    MinInclusive,
    MaxInclusive,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetRestriction {
    pub facet: Facet,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataRange {
    /// An unrestricted datatype.
    Datatype(Iri),
    /// A datatype narrowed by facets.
    Restriction {
        datatype: Iri,
        facets: Vec<FacetRestriction>,
    },
}

impl DataRange {
    pub fn datatype(&self) -> &Iri {
        match self {
            DataRange::Datatype(iri) => iri,
            DataRange::Restriction { datatype, .. } => datatype,
        }
    }

    pub fn facet(&self, facet: Facet) -> Option<&Literal> {
        match self {
            DataRange::Datatype(_) => None,
            DataRange::Restriction { facets, .. } => facets
                .iter()
                .find(|f| f.facet == facet)
                .map(|f| &f.value),
        }
    }
}

// ============================================================================
// Class expressions
// ============================================================================

/// An anonymous OWL class expression.
///
/// `intersection_of` / `union_of` normalize their argument lists (flattening
/// nested connectives of the same kind, collapsing singletons) so expression
/// equality is structural equality after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassExpression {
    Thing,
    Class(Iri),
    ObjectIntersectionOf(Vec<ClassExpression>),
    ObjectUnionOf(Vec<ClassExpression>),
    ObjectOneOf(Vec<Iri>),
    ObjectSomeValuesFrom {
        property: Iri,
        filler: Box<ClassExpression>,
    },
    ObjectAllValuesFrom {
        property: Iri,
        filler: Box<ClassExpression>,
    },
    ObjectHasValue {
        property: Iri,
        individual: Iri,
    },
    DataSomeValuesFrom {
        property: Iri,
        range: DataRange,
    },
    DataAllValuesFrom {
        property: Iri,
        range: DataRange,
    },
    DataHasValue {
        property: Iri,
        literal: Literal,
    },
}

impl ClassExpression {
    pub fn class(iri: impl Into<Iri>) -> Self {
        ClassExpression::Class(iri.into())
    }

    /// Normalized intersection: flattens nested intersections, drops `Thing`
    /// conjuncts, collapses a singleton to its only part, and an empty list
    /// to `Thing`.
    pub fn intersection_of(parts: Vec<ClassExpression>) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                ClassExpression::Thing => {}
                ClassExpression::ObjectIntersectionOf(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => ClassExpression::Thing,
            1 => flat.into_iter().next().unwrap_or(ClassExpression::Thing),
            _ => ClassExpression::ObjectIntersectionOf(flat),
        }
    }

    /// Normalized union: flattens nested unions and collapses singletons.
    pub fn union_of(parts: Vec<ClassExpression>) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                ClassExpression::ObjectUnionOf(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => ClassExpression::Thing,
            1 => flat.into_iter().next().unwrap_or(ClassExpression::Thing),
            _ => ClassExpression::ObjectUnionOf(flat),
        }
    }

    /// View this expression as its conjunct list (itself, unless it is an
    /// intersection).
    pub fn conjuncts(&self) -> std::slice::Iter<'_, ClassExpression> {
        match self {
            ClassExpression::ObjectIntersectionOf(parts) => parts.iter(),
            _ => std::slice::from_ref(self).iter(),
        }
    }

    pub fn is_thing(&self) -> bool {
        matches!(self, ClassExpression::Thing)
    }

    /// The named class IRI, if this expression is a bare named class.
    pub fn as_named(&self) -> Option<&Iri> {
        match self {
            ClassExpression::Class(iri) => Some(iri),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_normalizes_nesting_and_singletons() {
        let a = ClassExpression::class("http://ex.org#A");
        let b = ClassExpression::class("http://ex.org#B");
        let c = ClassExpression::class("http://ex.org#C");

        let nested = ClassExpression::intersection_of(vec![
            a.clone(),
            ClassExpression::intersection_of(vec![b.clone(), c.clone()]),
        ]);
        assert_eq!(
            nested,
            ClassExpression::ObjectIntersectionOf(vec![a.clone(), b, c])
        );

        assert_eq!(ClassExpression::intersection_of(vec![a.clone()]), a);
        assert_eq!(
            ClassExpression::intersection_of(vec![]),
            ClassExpression::Thing
        );
    }

    #[test]
    fn thing_conjuncts_are_dropped() {
        let a = ClassExpression::class("http://ex.org#A");
        assert_eq!(
            ClassExpression::intersection_of(vec![ClassExpression::Thing, a.clone()]),
            a
        );
    }

    #[test]
    fn conjunct_view_of_non_intersection_is_itself() {
        let a = ClassExpression::class("http://ex.org#A");
        let conjuncts: Vec<_> = a.conjuncts().collect();
        assert_eq!(conjuncts, vec![&a]);
    }
}
