//! Ontology-compliance pass over instance graphs.
//!
//! Classification and matching can only speak about entities the target
//! ontology knows. This pass rewrites an instance graph so that every
//! surviving node type, link property, and feature property has a usable OWL
//! counterpart:
//!
//! - an atomic type with no counterpart substitutes its nearest resolvable
//!   ancestor in the frame hierarchy
//! - disjunction members with no counterpart drop individually (a singleton
//!   disjunction is the exception: it substitutes like an atomic type, and
//!   is kept even when unresolvable rather than leaving the node untyped)
//! - links whose property has no counterpart prune outright, values and all
//! - link values that are themselves unresolvable drop from the value set
//! - features whose property has no counterpart prune
//!
//! Per-entity mismatches never raise: silent pruning is the contract. The
//! one hard failure is a root with no ontology entry point at all — nothing
//! can be classified or matched for such an instance.
//!
//! Resolution is a pure function: the input graph is never mutated, and
//! resolving an already-resolved graph reproduces it exactly.

use ahash::AHashMap;
use ontoframe_model::{
    FrameSchema, Identity, InstanceGraph, Link, NodeId, NodeTyping, PropertyKind,
};
use ontoframe_owl::Ontology;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("instance root has no ontology entry point")]
    UnresolvableRoot,
}

pub struct EntityResolver<'a> {
    schema: &'a FrameSchema,
    ontology: &'a Ontology,
}

impl<'a> EntityResolver<'a> {
    pub fn new(schema: &'a FrameSchema, ontology: &'a Ontology) -> Self {
        Self { schema, ontology }
    }

    /// Resolve the graph reachable from `root` into a fresh graph.
    ///
    /// Returns the resolved graph and its root id.
    pub fn resolve(
        &self,
        graph: &InstanceGraph,
        root: NodeId,
    ) -> Result<(InstanceGraph, NodeId), ResolveError> {
        let mut out = InstanceGraph::new();
        let mut memo: AHashMap<NodeId, Option<NodeId>> = AHashMap::new();
        match self.resolve_node(graph, root, &mut out, &mut memo) {
            Some(new_root) => Ok((out, new_root)),
            None => Err(ResolveError::UnresolvableRoot),
        }
    }

    /// Copy one node into `out`, or answer `None` if it is unresolvable.
    fn resolve_node(
        &self,
        graph: &InstanceGraph,
        id: NodeId,
        out: &mut InstanceGraph,
        memo: &mut AHashMap<NodeId, Option<NodeId>>,
    ) -> Option<NodeId> {
        if let Some(&cached) = memo.get(&id) {
            return cached;
        }
        let node = graph.node(id);

        // Reference nodes are never expanded: the referenced individual is
        // their entry point, so they resolve as-is.
        if node.is_reference() {
            let new_id = out.add_node(node.typing.clone());
            out.node_mut(new_id).reference = node.reference.clone();
            memo.insert(id, Some(new_id));
            return Some(new_id);
        }

        let Some(typing) = self.resolve_typing(&node.typing) else {
            memo.insert(id, None);
            return None;
        };

        // Register the copy before descending so cyclic graphs terminate.
        let new_id = out.add_node(typing);
        memo.insert(id, Some(new_id));

        for link in &node.links {
            if !self.property_usable(&link.property, PropertyKind::Object) {
                tracing::debug!(property = %link.property, "pruning link with no OWL counterpart");
                continue;
            }
            let mut values = Vec::with_capacity(link.values.len());
            for &value in &link.values {
                if let Some(resolved) = self.resolve_node(graph, value, out, memo) {
                    values.push(resolved);
                } else {
                    tracing::debug!(property = %link.property, "dropping unresolvable link value");
                }
            }
            if values.is_empty() {
                continue;
            }
            out.node_mut(new_id).links.push(Link {
                property: link.property.clone(),
                values,
            });
        }

        for feature in &node.features {
            if !self.property_usable(&feature.property, PropertyKind::Data) {
                tracing::debug!(property = %feature.property, "pruning feature with no OWL counterpart");
                continue;
            }
            out.node_mut(new_id).features.push(feature.clone());
        }

        Some(new_id)
    }

    fn resolve_typing(&self, typing: &NodeTyping) -> Option<NodeTyping> {
        match typing {
            NodeTyping::Atomic(concept) => {
                self.resolve_concept(concept).map(NodeTyping::Atomic)
            }
            NodeTyping::Disjunction(disjuncts) if disjuncts.len() == 1 => {
                // A singleton disjunct substitutes like an atomic type but is
                // never dropped: losing it would leave the node untyped.
                let only = &disjuncts[0];
                let kept = self.resolve_concept(only).unwrap_or_else(|| only.clone());
                Some(NodeTyping::Disjunction(vec![kept]))
            }
            NodeTyping::Disjunction(disjuncts) => {
                let kept: Vec<Identity> = disjuncts
                    .iter()
                    .filter(|d| self.concept_usable(d))
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(NodeTyping::Disjunction(kept))
                }
            }
        }
    }

    /// The concept itself if usable, else its nearest usable ancestor.
    fn resolve_concept(&self, concept: &Identity) -> Option<Identity> {
        if self.concept_usable(concept) {
            return Some(concept.clone());
        }
        self.schema
            .ancestors(concept)
            .into_iter()
            .find(|ancestor| self.concept_usable(ancestor))
    }

    fn concept_usable(&self, concept: &Identity) -> bool {
        self.schema
            .owl_class_of(concept)
            .is_some_and(|iri| self.ontology.contains_class(iri))
    }

    fn property_usable(&self, property: &Identity, kind: PropertyKind) -> bool {
        let Some(decl) = self.schema.property(property) else {
            return false;
        };
        if decl.kind != kind {
            return false;
        }
        decl.owl_property.as_ref().is_some_and(|iri| match kind {
            PropertyKind::Object => self.ontology.contains_object_property(iri),
            PropertyKind::Data => self.ontology.contains_data_property(iri),
        })
    }
}
