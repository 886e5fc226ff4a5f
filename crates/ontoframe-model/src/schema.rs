//! Concept/property hierarchy supplied by the external build pipeline.
//!
//! Declarations are *static*: the collaborator describes its classes and
//! slots through [`SchemaBuilder`] and the reasoning core only ever queries
//! the result (ancestor lookup, subsumption, OWL-equivalent resolution).
//! A declaration optionally carries the IRI of its OWL equivalent; absence
//! of an equivalent is what drives ancestor substitution and pruning during
//! entity resolution.

use crate::{Identity, ModelError};
use ahash::{AHashMap, AHashSet};
use ontoframe_owl::Iri;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Object-valued slot (a link to other frame-graph nodes).
    Object,
    /// Data-valued slot (numeric feature).
    Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDecl {
    pub identity: Identity,
    pub parents: Vec<Identity>,
    pub owl_class: Option<Iri>,
}

impl ConceptDecl {
    pub fn new(identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            parents: Vec::new(),
            owl_class: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<Identity>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_class(mut self, iri: impl Into<Iri>) -> Self {
        self.owl_class = Some(iri.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub identity: Identity,
    pub kind: PropertyKind,
    pub parents: Vec<Identity>,
    pub owl_property: Option<Iri>,
}

impl PropertyDecl {
    pub fn object(identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            kind: PropertyKind::Object,
            parents: Vec::new(),
            owl_property: None,
        }
    }

    pub fn data(identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            kind: PropertyKind::Data,
            parents: Vec::new(),
            owl_property: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<Identity>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_property(mut self, iri: impl Into<Iri>) -> Self {
        self.owl_property = Some(iri.into());
        self
    }
}

/// The resolved, queryable hierarchy.
#[derive(Debug, Clone, Default)]
pub struct FrameSchema {
    concepts: AHashMap<Identity, ConceptDecl>,
    properties: AHashMap<Identity, PropertyDecl>,
    concept_by_class: AHashMap<Iri, Identity>,
}

impl FrameSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn concept(&self, identity: &Identity) -> Option<&ConceptDecl> {
        self.concepts.get(identity)
    }

    pub fn property(&self, identity: &Identity) -> Option<&PropertyDecl> {
        self.properties.get(identity)
    }

    pub fn owl_class_of(&self, identity: &Identity) -> Option<&Iri> {
        self.concepts
            .get(identity)
            .and_then(|c| c.owl_class.as_ref())
    }

    pub fn owl_property_of(&self, identity: &Identity) -> Option<&Iri> {
        self.properties
            .get(identity)
            .and_then(|p| p.owl_property.as_ref())
    }

    /// Reverse lookup from a named OWL class back to the frame concept.
    pub fn concept_for_class(&self, iri: &Iri) -> Option<&Identity> {
        self.concept_by_class.get(iri)
    }

    /// Ancestors of a concept, nearest first.
    ///
    /// Breadth-first over declared parents in declaration order, so with
    /// multiple inheritance the nearest resolvable ancestor is found before
    /// any more distant one.
    pub fn ancestors(&self, identity: &Identity) -> Vec<Identity> {
        let mut out = Vec::new();
        let mut seen: AHashSet<Identity> = AHashSet::new();
        let mut frontier: Vec<Identity> = match self.concepts.get(identity) {
            Some(decl) => decl.parents.clone(),
            None => return out,
        };
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for parent in frontier {
                if !seen.insert(parent.clone()) {
                    continue;
                }
                if let Some(decl) = self.concepts.get(&parent) {
                    next.extend(decl.parents.iter().cloned());
                }
                out.push(parent);
            }
            frontier = next;
        }
        out
    }

    /// Reflexive-transitive concept subsumption in the frame hierarchy.
    pub fn is_subconcept(&self, sub: &Identity, sup: &Identity) -> bool {
        sub == sup || self.ancestors(sub).contains(sup)
    }
}

/// Static declaration surface for the build-pipeline collaborator.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    concepts: Vec<ConceptDecl>,
    properties: Vec<PropertyDecl>,
}

impl SchemaBuilder {
    pub fn concept(mut self, decl: ConceptDecl) -> Self {
        self.concepts.push(decl);
        self
    }

    pub fn property(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }

    /// Validate and assemble the schema.
    ///
    /// Rejects duplicate identities and parents that are never declared —
    /// a half-wired hierarchy would otherwise surface much later as wrong
    /// resolution results.
    pub fn build(self) -> Result<FrameSchema, ModelError> {
        let mut schema = FrameSchema::default();

        for decl in &self.concepts {
            if schema.concepts.contains_key(&decl.identity) {
                return Err(ModelError::DuplicateConcept(decl.identity.clone()));
            }
            if let Some(class) = &decl.owl_class {
                schema
                    .concept_by_class
                    .insert(class.clone(), decl.identity.clone());
            }
            schema.concepts.insert(decl.identity.clone(), decl.clone());
        }
        for decl in &self.properties {
            if schema.properties.contains_key(&decl.identity) {
                return Err(ModelError::DuplicateProperty(decl.identity.clone()));
            }
            schema
                .properties
                .insert(decl.identity.clone(), decl.clone());
        }

        for decl in &self.concepts {
            for parent in &decl.parents {
                if !schema.concepts.contains_key(parent) {
                    return Err(ModelError::UnknownParent {
                        child: decl.identity.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }
        for decl in &self.properties {
            for parent in &decl.parents {
                if !schema.properties.contains_key(parent) {
                    return Err(ModelError::UnknownParent {
                        child: decl.identity.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s)
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let schema = FrameSchema::builder()
            .concept(ConceptDecl::new("Entity"))
            .concept(ConceptDecl::new("Organism").with_parent("Entity"))
            .concept(ConceptDecl::new("Animal").with_parent("Organism"))
            .concept(ConceptDecl::new("Dog").with_parent("Animal"))
            .build()
            .unwrap();

        assert_eq!(
            schema.ancestors(&id("Dog")),
            vec![id("Animal"), id("Organism"), id("Entity")]
        );
        assert!(schema.is_subconcept(&id("Dog"), &id("Entity")));
        assert!(schema.is_subconcept(&id("Dog"), &id("Dog")));
        assert!(!schema.is_subconcept(&id("Entity"), &id("Dog")));
    }

    #[test]
    fn multiple_inheritance_visits_near_parents_before_grandparents() {
        let schema = FrameSchema::builder()
            .concept(ConceptDecl::new("Root"))
            .concept(ConceptDecl::new("Left").with_parent("Root"))
            .concept(ConceptDecl::new("Right").with_parent("Root"))
            .concept(
                ConceptDecl::new("Child")
                    .with_parent("Left")
                    .with_parent("Right"),
            )
            .build()
            .unwrap();

        assert_eq!(
            schema.ancestors(&id("Child")),
            vec![id("Left"), id("Right"), id("Root")]
        );
    }

    #[test]
    fn build_rejects_unknown_parents_and_duplicates() {
        let missing = FrameSchema::builder()
            .concept(ConceptDecl::new("A").with_parent("Nowhere"))
            .build();
        assert!(matches!(missing, Err(ModelError::UnknownParent { .. })));

        let duplicate = FrameSchema::builder()
            .concept(ConceptDecl::new("A"))
            .concept(ConceptDecl::new("A"))
            .build();
        assert!(matches!(duplicate, Err(ModelError::DuplicateConcept(_))));
    }
}
