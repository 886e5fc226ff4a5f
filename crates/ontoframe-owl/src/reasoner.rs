//! The DL-reasoner boundary, plus a told/structural reference implementation.
//!
//! The reasoning core consumes a description-logic reasoner through the
//! narrow [`DlReasoner`] trait: entailment checks over class expressions,
//! type-of / instances-of retrieval, and subsumption. All results materialize
//! as finite sets before translation back to frame-model identities — there
//! is no streaming surface.
//!
//! [`StructuralReasoner`] answers those queries from told axioms only:
//! named-class hierarchy, class definitions (EquivalentClasses with a complex
//! side), and asserted individual networks. It is *sound but incomplete*
//! relative to full DL semantics, which is the right trade for an embedded
//! default: everything it reports is entailed, and deployments that need
//! completeness substitute an external reasoner behind the same trait.

use crate::axiom::Axiom;
use crate::expression::{ClassExpression, DataRange, Facet, Literal};
use crate::iri::Iri;
use crate::ontology::Ontology;
use ahash::AHashSet;
use std::collections::BTreeSet;

/// Nesting limit for definition expansion. Hitting it means the told
/// definitions are mutually recursive beyond anything the structural
/// rules can decide.
const MAX_DEPTH: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ReasonerError {
    #[error("inconsistent ontology: {0}")]
    Inconsistent(String),
    #[error("unsupported construct: {0}")]
    Unsupported(String),
    #[error("reasoner backend failure: {0}")]
    Backend(String),
}

/// Narrow query interface onto an external DL reasoner.
///
/// Calls are synchronous and potentially expensive; this layer adds no
/// timeout or cancellation — callers wanting either wrap the boundary.
pub trait DlReasoner {
    fn is_entailed(&self, ontology: &Ontology, axiom: &Axiom) -> Result<bool, ReasonerError>;

    fn is_subsumed_by(
        &self,
        ontology: &Ontology,
        sub: &ClassExpression,
        sup: &ClassExpression,
    ) -> Result<bool, ReasonerError>;

    fn equivalent_classes(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
    ) -> Result<BTreeSet<Iri>, ReasonerError>;

    fn super_classes(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
        direct: bool,
    ) -> Result<BTreeSet<Iri>, ReasonerError>;

    fn sub_classes(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
        direct: bool,
    ) -> Result<BTreeSet<Iri>, ReasonerError>;

    fn types_of(
        &self,
        ontology: &Ontology,
        individual: &Iri,
        direct: bool,
    ) -> Result<BTreeSet<Iri>, ReasonerError>;

    fn instances_of(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
    ) -> Result<BTreeSet<Iri>, ReasonerError>;
}

/// Told/structural reasoner over the in-memory ontology.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralReasoner;

impl StructuralReasoner {
    pub fn new() -> Self {
        Self
    }

    fn depth_check(&self, depth: usize) -> Result<(), ReasonerError> {
        if depth > MAX_DEPTH {
            return Err(ReasonerError::Unsupported(
                "definition nesting exceeds structural depth limit".to_string(),
            ));
        }
        Ok(())
    }

    /// Structural subsumption: does `sub ⊑ sup` follow from told axioms?
    fn subsumed(
        &self,
        ont: &Ontology,
        sub: &ClassExpression,
        sup: &ClassExpression,
        depth: usize,
    ) -> Result<bool, ReasonerError> {
        self.depth_check(depth)?;
        if sub == sup || sup.is_thing() {
            return Ok(true);
        }

        // An intersection superclass splits unconditionally.
        if let ClassExpression::ObjectIntersectionOf(parts) = sup {
            for part in parts {
                if !self.subsumed(ont, sub, part, depth + 1)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        // Subclass-side decomposition comes before a union superclass so a
        // union subclass is checked disjunct-by-disjunct.
        match sub {
            ClassExpression::Thing => return Ok(false),
            ClassExpression::ObjectUnionOf(parts) => {
                for part in parts {
                    if !self.subsumed(ont, part, sup, depth + 1)? {
                        return Ok(false);
                    }
                }
                return Ok(true);
            }
            ClassExpression::ObjectOneOf(individuals) => {
                for individual in individuals {
                    if !self.satisfies(ont, individual, sup, depth + 1)? {
                        return Ok(false);
                    }
                }
                return Ok(true);
            }
            _ => {}
        }

        if let ClassExpression::ObjectUnionOf(parts) = sup {
            for part in parts {
                if self.subsumed(ont, sub, part, depth + 1)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        // Named superclass: its definitions can prove subsumption for any
        // subclass shape.
        if let ClassExpression::Class(sup_name) = sup {
            for definition in ont.definitions_of(sup_name) {
                if self.subsumed(ont, sub, definition, depth + 1)? {
                    return Ok(true);
                }
            }
        }

        // Conjunct-wise structural rules.
        for conjunct in sub.conjuncts() {
            if self.conjunct_proves(ont, conjunct, sup, depth)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Can a single conjunct of the subclass side prove the superclass form?
    fn conjunct_proves(
        &self,
        ont: &Ontology,
        conjunct: &ClassExpression,
        sup: &ClassExpression,
        depth: usize,
    ) -> Result<bool, ReasonerError> {
        use ClassExpression as CE;
        match (conjunct, sup) {
            (CE::Class(name), _) => {
                let mut visited = AHashSet::new();
                self.named_proves(ont, name, sup, depth, &mut visited)
            }
            (
                CE::ObjectSomeValuesFrom {
                    property: q,
                    filler: told,
                },
                CE::ObjectSomeValuesFrom {
                    property: p,
                    filler: wanted,
                },
            ) => Ok(ont.is_told_subproperty(q, p)
                && self.subsumed(ont, told, wanted, depth + 1)?),
            (
                CE::ObjectHasValue {
                    property: q,
                    individual,
                },
                CE::ObjectSomeValuesFrom {
                    property: p,
                    filler,
                },
            ) => Ok(ont.is_told_subproperty(q, p)
                && self.satisfies(ont, individual, filler, depth + 1)?),
            (
                CE::ObjectHasValue {
                    property: q,
                    individual: i,
                },
                CE::ObjectHasValue {
                    property: p,
                    individual: j,
                },
            ) => Ok(ont.is_told_subproperty(q, p) && i == j),
            (
                CE::ObjectAllValuesFrom {
                    property: q,
                    filler: told,
                },
                CE::ObjectAllValuesFrom {
                    property: p,
                    filler: wanted,
                },
                // Universal restrictions are contravariant in the property:
                // closing the values of q also closes any sub-property p of q.
            ) => Ok(ont.is_told_subproperty(p, q)
                && self.subsumed(ont, told, wanted, depth + 1)?),
            (
                CE::DataSomeValuesFrom {
                    property: q,
                    range: told,
                },
                CE::DataSomeValuesFrom {
                    property: p,
                    range: wanted,
                },
            ) => Ok(ont.is_told_subproperty(q, p) && range_included(told, wanted)),
            (
                CE::DataHasValue {
                    property: q,
                    literal,
                },
                CE::DataSomeValuesFrom {
                    property: p,
                    range,
                },
            ) => Ok(ont.is_told_subproperty(q, p) && literal_in_range(literal, range)),
            (
                CE::DataHasValue {
                    property: q,
                    literal: told,
                },
                CE::DataHasValue {
                    property: p,
                    literal: wanted,
                },
            ) => Ok(ont.is_told_subproperty(q, p) && literal_eq(told, wanted)),
            (
                CE::DataAllValuesFrom {
                    property: q,
                    range: told,
                },
                CE::DataAllValuesFrom {
                    property: p,
                    range: wanted,
                },
            ) => Ok(ont.is_told_subproperty(p, q) && range_included(told, wanted)),
            (CE::ObjectOneOf(told), CE::ObjectOneOf(wanted)) => {
                Ok(told.iter().all(|i| wanted.contains(i)))
            }
            _ => Ok(false),
        }
    }

    /// Expand a named class upward: told superclasses, told complex
    /// superclasses, and definitions.
    fn named_proves(
        &self,
        ont: &Ontology,
        name: &Iri,
        sup: &ClassExpression,
        depth: usize,
        visited: &mut AHashSet<Iri>,
    ) -> Result<bool, ReasonerError> {
        if !visited.insert(name.clone()) {
            return Ok(false);
        }
        if let ClassExpression::Class(sup_name) = sup {
            if ont.is_told_subclass(name, sup_name) {
                return Ok(true);
            }
        }
        for definition in ont.definitions_of(name) {
            if self.subsumed(ont, definition, sup, depth + 1)? {
                return Ok(true);
            }
        }
        for super_expr in ont.super_expressions_of(name) {
            if self.subsumed(ont, super_expr, sup, depth + 1)? {
                return Ok(true);
            }
        }
        for super_name in ont.direct_superclasses(name) {
            if self.named_proves(ont, super_name, sup, depth, visited)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Is `individual` an instance of `expr`, given the asserted network?
    fn satisfies(
        &self,
        ont: &Ontology,
        individual: &Iri,
        expr: &ClassExpression,
        depth: usize,
    ) -> Result<bool, ReasonerError> {
        use ClassExpression as CE;
        self.depth_check(depth)?;
        match expr {
            CE::Thing => Ok(true),
            CE::Class(name) => {
                for asserted in ont.asserted_types(individual) {
                    if self.subsumed(ont, asserted, expr, depth + 1)? {
                        return Ok(true);
                    }
                }
                for definition in ont.definitions_of(name) {
                    if self.satisfies(ont, individual, definition, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            CE::ObjectIntersectionOf(parts) => {
                for part in parts {
                    if !self.satisfies(ont, individual, part, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            CE::ObjectUnionOf(parts) => {
                for part in parts {
                    if self.satisfies(ont, individual, part, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            CE::ObjectOneOf(individuals) => Ok(individuals.contains(individual)),
            CE::ObjectSomeValuesFrom { property, filler } => {
                for (asserted_property, value) in ont.object_values(individual) {
                    if ont.is_told_subproperty(asserted_property, property)
                        && self.satisfies(ont, value, filler, depth + 1)?
                    {
                        return Ok(true);
                    }
                }
                self.type_conjunct_satisfies(ont, individual, expr, depth)
            }
            CE::ObjectHasValue {
                property,
                individual: wanted,
            } => {
                for (asserted_property, value) in ont.object_values(individual) {
                    if ont.is_told_subproperty(asserted_property, property) && value == wanted {
                        return Ok(true);
                    }
                }
                self.type_conjunct_satisfies(ont, individual, expr, depth)
            }
            CE::ObjectAllValuesFrom { .. }
            | CE::DataAllValuesFrom { .. } => {
                // Universal restrictions hold only when a closure axiom was
                // asserted for the individual; the open world never entails
                // them from successor assertions alone.
                self.type_conjunct_satisfies(ont, individual, expr, depth)
            }
            CE::DataSomeValuesFrom { property, range } => {
                for (asserted_property, literal) in ont.data_values(individual) {
                    if ont.is_told_subproperty(asserted_property, property)
                        && literal_in_range(literal, range)
                    {
                        return Ok(true);
                    }
                }
                self.type_conjunct_satisfies(ont, individual, expr, depth)
            }
            CE::DataHasValue { property, literal } => {
                for (asserted_property, asserted) in ont.data_values(individual) {
                    if ont.is_told_subproperty(asserted_property, property)
                        && literal_eq(asserted, literal)
                    {
                        return Ok(true);
                    }
                }
                self.type_conjunct_satisfies(ont, individual, expr, depth)
            }
        }
    }

    /// Does some conjunct of an asserted type of `individual` structurally
    /// entail `wanted`?
    fn type_conjunct_satisfies(
        &self,
        ont: &Ontology,
        individual: &Iri,
        wanted: &ClassExpression,
        depth: usize,
    ) -> Result<bool, ReasonerError> {
        for asserted in ont.asserted_types(individual) {
            for conjunct in asserted.conjuncts() {
                if self.conjunct_proves(ont, conjunct, wanted, depth + 1)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl DlReasoner for StructuralReasoner {
    fn is_entailed(&self, ontology: &Ontology, axiom: &Axiom) -> Result<bool, ReasonerError> {
        match axiom {
            Axiom::SubClassOf { sub, sup } => self.subsumed(ontology, sub, sup, 0),
            Axiom::EquivalentClasses(exprs) => {
                for (i, left) in exprs.iter().enumerate() {
                    for right in exprs.iter().skip(i + 1) {
                        if !self.subsumed(ontology, left, right, 0)?
                            || !self.subsumed(ontology, right, left, 0)?
                        {
                            return Ok(false);
                        }
                    }
                }
                Ok(true)
            }
            Axiom::ClassAssertion { class, individual } => {
                self.satisfies(ontology, individual, class, 0)
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => Ok(ontology.object_values(subject).iter().any(|(q, v)| {
                ontology.is_told_subproperty(q, property) && v == object
            })),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                literal,
            } => Ok(ontology.data_values(subject).iter().any(|(q, l)| {
                ontology.is_told_subproperty(q, property) && literal_eq(l, literal)
            })),
            Axiom::SubObjectPropertyOf { sub, sup } | Axiom::SubDataPropertyOf { sub, sup } => {
                Ok(ontology.is_told_subproperty(sub, sup))
            }
            Axiom::Declaration(entity) => Ok(match entity {
                crate::axiom::Entity::Class(iri) => ontology.contains_class(iri),
                crate::axiom::Entity::ObjectProperty(iri) => {
                    ontology.contains_object_property(iri)
                }
                crate::axiom::Entity::DataProperty(iri) => ontology.contains_data_property(iri),
                crate::axiom::Entity::NamedIndividual(iri) => ontology.contains_individual(iri),
            }),
            Axiom::DisjointClasses(_) => Err(ReasonerError::Unsupported(
                "disjointness entailment".to_string(),
            )),
        }
    }

    fn is_subsumed_by(
        &self,
        ontology: &Ontology,
        sub: &ClassExpression,
        sup: &ClassExpression,
    ) -> Result<bool, ReasonerError> {
        self.subsumed(ontology, sub, sup, 0)
    }

    fn equivalent_classes(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
    ) -> Result<BTreeSet<Iri>, ReasonerError> {
        let mut out = BTreeSet::new();
        for class in ontology.classes() {
            let named = ClassExpression::Class(class.clone());
            if self.subsumed(ontology, expression, &named, 0)?
                && self.subsumed(ontology, &named, expression, 0)?
            {
                out.insert(class.clone());
            }
        }
        Ok(out)
    }

    fn super_classes(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
        direct: bool,
    ) -> Result<BTreeSet<Iri>, ReasonerError> {
        let mut out = BTreeSet::new();
        for class in ontology.classes() {
            let named = ClassExpression::Class(class.clone());
            if self.subsumed(ontology, expression, &named, 0)?
                && !self.subsumed(ontology, &named, expression, 0)?
            {
                out.insert(class.clone());
            }
        }
        if direct {
            out = self.most_specific(ontology, out)?;
        }
        Ok(out)
    }

    fn sub_classes(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
        direct: bool,
    ) -> Result<BTreeSet<Iri>, ReasonerError> {
        let mut out = BTreeSet::new();
        for class in ontology.classes() {
            let named = ClassExpression::Class(class.clone());
            if self.subsumed(ontology, &named, expression, 0)?
                && !self.subsumed(ontology, expression, &named, 0)?
            {
                out.insert(class.clone());
            }
        }
        if direct {
            out = self.most_general(ontology, out)?;
        }
        Ok(out)
    }

    fn types_of(
        &self,
        ontology: &Ontology,
        individual: &Iri,
        direct: bool,
    ) -> Result<BTreeSet<Iri>, ReasonerError> {
        let mut out = BTreeSet::new();
        for class in ontology.classes() {
            let named = ClassExpression::Class(class.clone());
            if self.satisfies(ontology, individual, &named, 0)? {
                out.insert(class.clone());
            }
        }
        if direct {
            out = self.most_specific(ontology, out)?;
        }
        Ok(out)
    }

    fn instances_of(
        &self,
        ontology: &Ontology,
        expression: &ClassExpression,
    ) -> Result<BTreeSet<Iri>, ReasonerError> {
        let mut out = BTreeSet::new();
        for individual in ontology.individuals() {
            if self.satisfies(ontology, individual, expression, 0)? {
                out.insert(individual.clone());
            }
        }
        Ok(out)
    }
}

impl StructuralReasoner {
    /// Keep only classes with no strict subclass also in the set.
    fn most_specific(
        &self,
        ontology: &Ontology,
        classes: BTreeSet<Iri>,
    ) -> Result<BTreeSet<Iri>, ReasonerError> {
        let mut out = BTreeSet::new();
        'outer: for candidate in &classes {
            let candidate_expr = ClassExpression::Class(candidate.clone());
            for other in &classes {
                if other == candidate {
                    continue;
                }
                let other_expr = ClassExpression::Class(other.clone());
                if self.subsumed(ontology, &other_expr, &candidate_expr, 0)?
                    && !self.subsumed(ontology, &candidate_expr, &other_expr, 0)?
                {
                    continue 'outer;
                }
            }
            out.insert(candidate.clone());
        }
        Ok(out)
    }

    /// Keep only classes with no strict superclass also in the set.
    fn most_general(
        &self,
        ontology: &Ontology,
        classes: BTreeSet<Iri>,
    ) -> Result<BTreeSet<Iri>, ReasonerError> {
        let mut out = BTreeSet::new();
        'outer: for candidate in &classes {
            let candidate_expr = ClassExpression::Class(candidate.clone());
            for other in &classes {
                if other == candidate {
                    continue;
                }
                let other_expr = ClassExpression::Class(other.clone());
                if self.subsumed(ontology, &candidate_expr, &other_expr, 0)?
                    && !self.subsumed(ontology, &other_expr, &candidate_expr, 0)?
                {
                    continue 'outer;
                }
            }
            out.insert(candidate.clone());
        }
        Ok(out)
    }
}

// ============================================================================
// Data-range helpers
// ============================================================================

fn facet_bound(range: &DataRange, facet: Facet) -> Option<f64> {
    range.facet(facet).and_then(Literal::numeric_value)
}

/// Is `told` a sub-range of `wanted`? Datatypes must agree; an absent bound
/// on `wanted` is unbounded, an absent bound on `told` only fits an
/// unbounded `wanted` side.
fn range_included(told: &DataRange, wanted: &DataRange) -> bool {
    if told.datatype() != wanted.datatype() {
        return false;
    }
    let fits_min = match (
        facet_bound(told, Facet::MinInclusive),
        facet_bound(wanted, Facet::MinInclusive),
    ) {
        (_, None) => true,
        (Some(told_min), Some(wanted_min)) => wanted_min <= told_min,
        (None, Some(_)) => false,
    };
    let fits_max = match (
        facet_bound(told, Facet::MaxInclusive),
        facet_bound(wanted, Facet::MaxInclusive),
    ) {
        (_, None) => true,
        (Some(told_max), Some(wanted_max)) => told_max <= wanted_max,
        (None, Some(_)) => false,
    };
    fits_min && fits_max
}

fn literal_in_range(literal: &Literal, range: &DataRange) -> bool {
    if literal.datatype != *range.datatype() {
        return false;
    }
    let Some(value) = literal.numeric_value() else {
        return matches!(range, DataRange::Datatype(_));
    };
    let above_min = facet_bound(range, Facet::MinInclusive)
        .map(|min| min <= value)
        .unwrap_or(true);
    let below_max = facet_bound(range, Facet::MaxInclusive)
        .map(|max| value <= max)
        .unwrap_or(true);
    above_min && below_max
}

fn literal_eq(left: &Literal, right: &Literal) -> bool {
    if left.datatype != right.datatype {
        return false;
    }
    match (left.numeric_value(), right.numeric_value()) {
        (Some(l), Some(r)) => l == r,
        _ => left.lexical == right.lexical,
    }
}
