//! In-memory ontology: signature, told hierarchies, and an exact axiom store.
//!
//! The ontology is the shared mutable state behind classification and
//! matching: renderers add transient axioms to it, the ontology-linked
//! matchers add and retract whole per-instance axiom groups, and the reasoner
//! answers from it. Everything flows through [`Ontology::add_axiom`] /
//! [`Ontology::remove_axiom`] so a retraction removes *exactly* what the
//! corresponding addition put in — the store is a multiset, and the derived
//! indexes are maintained incrementally in both directions.

use crate::axiom::{Axiom, Entity};
use crate::expression::{ClassExpression, Literal};
use crate::iri::Iri;
use ahash::{AHashMap, AHashSet};

#[derive(Debug, Default, Clone)]
pub struct Ontology {
    classes: AHashSet<Iri>,
    object_properties: AHashSet<Iri>,
    data_properties: AHashSet<Iri>,
    individuals: AHashSet<Iri>,

    /// The axiom multiset. Order is insertion order; removal takes the first
    /// structurally equal occurrence.
    axioms: Vec<Axiom>,

    // Derived indexes, maintained on every add/remove.
    direct_superclasses: AHashMap<Iri, Vec<Iri>>,
    direct_subclasses: AHashMap<Iri, Vec<Iri>>,
    direct_superproperties: AHashMap<Iri, Vec<Iri>>,
    direct_subproperties: AHashMap<Iri, Vec<Iri>>,
    /// Complex definitions of named classes (`A EquivalentClasses expr`).
    definitions: AHashMap<Iri, Vec<ClassExpression>>,
    /// Complex told superclasses of named classes (`A SubClassOf expr`).
    super_expressions: AHashMap<Iri, Vec<ClassExpression>>,
    class_assertions: AHashMap<Iri, Vec<ClassExpression>>,
    object_assertions: AHashMap<Iri, Vec<(Iri, Iri)>>,
    data_assertions: AHashMap<Iri, Vec<(Iri, Literal)>>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Signature
    // ------------------------------------------------------------------

    pub fn declare_class(&mut self, iri: impl Into<Iri>) {
        self.add_axiom(Axiom::Declaration(Entity::Class(iri.into())));
    }

    pub fn declare_object_property(&mut self, iri: impl Into<Iri>) {
        self.add_axiom(Axiom::Declaration(Entity::ObjectProperty(iri.into())));
    }

    pub fn declare_data_property(&mut self, iri: impl Into<Iri>) {
        self.add_axiom(Axiom::Declaration(Entity::DataProperty(iri.into())));
    }

    pub fn declare_individual(&mut self, iri: impl Into<Iri>) {
        self.add_axiom(Axiom::Declaration(Entity::NamedIndividual(iri.into())));
    }

    pub fn contains_class(&self, iri: &Iri) -> bool {
        self.classes.contains(iri)
    }

    pub fn contains_object_property(&self, iri: &Iri) -> bool {
        self.object_properties.contains(iri)
    }

    pub fn contains_data_property(&self, iri: &Iri) -> bool {
        self.data_properties.contains(iri)
    }

    pub fn contains_individual(&self, iri: &Iri) -> bool {
        self.individuals.contains(iri)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Iri> {
        self.classes.iter()
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Iri> {
        self.individuals.iter()
    }

    // ------------------------------------------------------------------
    // Axiom store
    // ------------------------------------------------------------------

    pub fn add_axiom(&mut self, axiom: Axiom) {
        self.index_axiom(&axiom, true);
        self.axioms.push(axiom);
    }

    pub fn add_axioms<I: IntoIterator<Item = Axiom>>(&mut self, axioms: I) {
        for axiom in axioms {
            self.add_axiom(axiom);
        }
    }

    /// Remove one occurrence of a structurally equal axiom.
    ///
    /// Returns false (and changes nothing) if the axiom is not present.
    pub fn remove_axiom(&mut self, axiom: &Axiom) -> bool {
        let Some(pos) = self.axioms.iter().position(|a| a == axiom) else {
            return false;
        };
        self.axioms.remove(pos);
        self.index_axiom(axiom, false);
        true
    }

    pub fn remove_axioms(&mut self, axioms: &[Axiom]) {
        for axiom in axioms {
            self.remove_axiom(axiom);
        }
    }

    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    // ------------------------------------------------------------------
    // Told hierarchy queries
    // ------------------------------------------------------------------

    /// Reflexive-transitive told subclass check between named classes.
    pub fn is_told_subclass(&self, sub: &Iri, sup: &Iri) -> bool {
        reachable(&self.direct_superclasses, sub, sup)
    }

    /// Reflexive-transitive told sub-property check.
    pub fn is_told_subproperty(&self, sub: &Iri, sup: &Iri) -> bool {
        reachable(&self.direct_superproperties, sub, sup)
    }

    /// All declared sub-properties of `property`, transitively, excluding
    /// `property` itself.
    pub fn sub_properties(&self, property: &Iri) -> AHashSet<Iri> {
        let mut out = AHashSet::new();
        let mut frontier = vec![property.clone()];
        while let Some(next) = frontier.pop() {
            if let Some(subs) = self.direct_subproperties.get(&next) {
                for sub in subs {
                    if out.insert(sub.clone()) {
                        frontier.push(sub.clone());
                    }
                }
            }
        }
        out
    }

    pub fn direct_superclasses(&self, class: &Iri) -> &[Iri] {
        self.direct_superclasses
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Complex definitions told for a named class.
    pub fn definitions_of(&self, class: &Iri) -> &[ClassExpression] {
        self.definitions
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Complex told superclasses of a named class.
    pub fn super_expressions_of(&self, class: &Iri) -> &[ClassExpression] {
        self.super_expressions
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Assertion queries
    // ------------------------------------------------------------------

    pub fn asserted_types(&self, individual: &Iri) -> &[ClassExpression] {
        self.class_assertions
            .get(individual)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn object_values(&self, individual: &Iri) -> &[(Iri, Iri)] {
        self.object_assertions
            .get(individual)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn data_values(&self, individual: &Iri) -> &[(Iri, Literal)] {
        self.data_assertions
            .get(individual)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Index maintenance
    // ------------------------------------------------------------------

    fn index_axiom(&mut self, axiom: &Axiom, add: bool) {
        match axiom {
            Axiom::Declaration(entity) => self.index_declaration(entity, add),
            Axiom::SubClassOf { sub, sup } => match (sub.as_named(), sup.as_named()) {
                (Some(sub), Some(sup)) => {
                    apply(&mut self.direct_superclasses, sub, sup, add);
                    apply(&mut self.direct_subclasses, sup, sub, add);
                }
                (Some(sub), None) => {
                    apply_expr(&mut self.super_expressions, sub, sup, add);
                }
                _ => {}
            },
            Axiom::EquivalentClasses(exprs) => {
                for (i, left) in exprs.iter().enumerate() {
                    for right in exprs.iter().skip(i + 1) {
                        match (left.as_named(), right.as_named()) {
                            (Some(l), Some(r)) => {
                                apply(&mut self.direct_superclasses, l, r, add);
                                apply(&mut self.direct_superclasses, r, l, add);
                                apply(&mut self.direct_subclasses, l, r, add);
                                apply(&mut self.direct_subclasses, r, l, add);
                            }
                            (Some(l), None) => {
                                apply_expr(&mut self.definitions, l, right, add)
                            }
                            (None, Some(r)) => {
                                apply_expr(&mut self.definitions, r, left, add)
                            }
                            (None, None) => {}
                        }
                    }
                }
            }
            Axiom::DisjointClasses(_) => {}
            Axiom::SubObjectPropertyOf { sub, sup } | Axiom::SubDataPropertyOf { sub, sup } => {
                apply(&mut self.direct_superproperties, sub, sup, add);
                apply(&mut self.direct_subproperties, sup, sub, add);
            }
            Axiom::ClassAssertion { class, individual } => {
                apply_expr(&mut self.class_assertions, individual, class, add);
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                let entry = self.object_assertions.entry(subject.clone()).or_default();
                let pair = (property.clone(), object.clone());
                if add {
                    entry.push(pair);
                } else if let Some(pos) = entry.iter().position(|p| *p == pair) {
                    entry.remove(pos);
                }
            }
            Axiom::DataPropertyAssertion {
                property,
                subject,
                literal,
            } => {
                let entry = self.data_assertions.entry(subject.clone()).or_default();
                let pair = (property.clone(), literal.clone());
                if add {
                    entry.push(pair);
                } else if let Some(pos) = entry.iter().position(|p| *p == pair) {
                    entry.remove(pos);
                }
            }
        }
    }

    fn index_declaration(&mut self, entity: &Entity, add: bool) {
        if !add {
            // The signature entry stays while any other identical declaration
            // remains in the multiset.
            let declaration = Axiom::Declaration(entity.clone());
            if self.axioms.iter().any(|a| *a == declaration) {
                return;
            }
        }
        let set = match entity {
            Entity::Class(_) => &mut self.classes,
            Entity::ObjectProperty(_) => &mut self.object_properties,
            Entity::DataProperty(_) => &mut self.data_properties,
            Entity::NamedIndividual(_) => &mut self.individuals,
        };
        if add {
            set.insert(entity.iri().clone());
        } else {
            set.remove(entity.iri());
        }
    }
}

fn apply(map: &mut AHashMap<Iri, Vec<Iri>>, key: &Iri, value: &Iri, add: bool) {
    let entry = map.entry(key.clone()).or_default();
    if add {
        entry.push(value.clone());
    } else if let Some(pos) = entry.iter().position(|v| v == value) {
        entry.remove(pos);
    }
}

fn apply_expr(
    map: &mut AHashMap<Iri, Vec<ClassExpression>>,
    key: &Iri,
    value: &ClassExpression,
    add: bool,
) {
    let entry = map.entry(key.clone()).or_default();
    if add {
        entry.push(value.clone());
    } else if let Some(pos) = entry.iter().position(|v| v == value) {
        entry.remove(pos);
    }
}

fn reachable(edges: &AHashMap<Iri, Vec<Iri>>, from: &Iri, to: &Iri) -> bool {
    if from == to {
        return true;
    }
    let mut seen: AHashSet<&Iri> = AHashSet::new();
    let mut frontier = vec![from];
    while let Some(next) = frontier.pop() {
        if let Some(parents) = edges.get(next) {
            for parent in parents {
                if parent == to {
                    return true;
                }
                if seen.insert(parent) {
                    frontier.push(parent);
                }
            }
        }
    }
    false
}
