//! Ontology-linked matcher over named class definitions.
//!
//! Each stored instance materializes *in* the ontology as a named class
//! defined (EquivalentClasses) by its rendered expression. Matching a query
//! is then one entailed-subsumption check per stored class against the live
//! ontology state; the cost moved from query time to add/remove
//! bookkeeping.

use super::{InstanceMatcher, MatcherBase};
use crate::config::{ConfigError, ReasoningConfig};
use crate::monitor::MonitorRegistry;
use crate::ReasonError;
use ontoframe_model::{FrameSchema, Identity, InstanceGraph, NodeId};
use ontoframe_owl::{Axiom, ClassExpression, DlReasoner, Entity, Iri, Ontology};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

struct StoredConcept {
    class: Iri,
    axioms: Vec<Axiom>,
}

struct State {
    ontology: Ontology,
    stored: BTreeMap<Identity, StoredConcept>,
}

pub struct ConceptMatcher<R> {
    base: MatcherBase<R>,
    state: RwLock<State>,
}

impl<R: DlReasoner> ConceptMatcher<R> {
    pub fn new(
        schema: Arc<FrameSchema>,
        reasoner: R,
        ontology: Ontology,
        config: ReasoningConfig,
        monitors: Arc<MonitorRegistry>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base: MatcherBase::new(schema, reasoner, config, monitors)?,
            state: RwLock::new(State {
                ontology,
                stored: BTreeMap::new(),
            }),
        })
    }

    /// Minted class name for a stored instance, distinct from its
    /// individual-IRI namespace entry.
    fn defined_class_iri(&self, identity: &Identity) -> Iri {
        Iri::in_namespace(
            &self.base.config.instance_namespace,
            &format!("concept-{identity}"),
        )
    }
}

impl<R: DlReasoner> InstanceMatcher for ConceptMatcher<R> {
    fn add(
        &self,
        instance: &InstanceGraph,
        root: NodeId,
        identity: Identity,
    ) -> Result<bool, ReasonError> {
        let mut state = self.state.write();
        if state.stored.contains_key(&identity) {
            tracing::debug!(%identity, "duplicate add ignored");
            return Ok(false);
        }
        let rendered = self.base.resolve_and_render(&state.ontology, instance, root)?;
        let class = self.defined_class_iri(&identity);

        let mut axioms = rendered.transient_axioms;
        axioms.push(Axiom::Declaration(Entity::Class(class.clone())));
        axioms.push(Axiom::EquivalentClasses(vec![
            ClassExpression::Class(class.clone()),
            rendered.expression,
        ]));
        state.ontology.add_axioms(axioms.iter().cloned());
        state
            .stored
            .insert(identity, StoredConcept { class, axioms });
        Ok(true)
    }

    fn remove(&self, identity: &Identity) -> bool {
        let mut state = self.state.write();
        let Some(entry) = state.stored.remove(identity) else {
            return false;
        };
        state.ontology.remove_axioms(&entry.axioms);
        true
    }

    fn find_matches(
        &self,
        query: &InstanceGraph,
        root: NodeId,
    ) -> Result<BTreeSet<Identity>, ReasonError> {
        self.base.with_match_monitors(
            |_request| {
                let mut state = self.state.write();
                let state = &mut *state;
                let rendered = self.base.resolve_and_render(&state.ontology, query, root)?;
                state
                    .ontology
                    .add_axioms(rendered.transient_axioms.iter().cloned());
                let outcome: Result<BTreeSet<Identity>, ReasonError> = (|| {
                    let mut hits = BTreeSet::new();
                    for (identity, entry) in &state.stored {
                        let entailed = self.base.reasoner.is_entailed(
                            &state.ontology,
                            &Axiom::SubClassOf {
                                sub: ClassExpression::Class(entry.class.clone()),
                                sup: rendered.expression.clone(),
                            },
                        )?;
                        if entailed {
                            hits.insert(identity.clone());
                        }
                    }
                    Ok(hits)
                })();
                state.ontology.remove_axioms(&rendered.transient_axioms);
                outcome
            },
            |hits| Some(hits.len()),
        )
    }

    fn matches(
        &self,
        query: &InstanceGraph,
        query_root: NodeId,
        instance: &InstanceGraph,
        instance_root: NodeId,
    ) -> Result<bool, ReasonError> {
        self.base.with_match_monitors(
            |_request| {
                let mut state = self.state.write();
                let state = &mut *state;
                let query_rendered =
                    self.base.resolve_and_render(&state.ontology, query, query_root)?;
                let instance_rendered =
                    self.base
                        .resolve_and_render(&state.ontology, instance, instance_root)?;
                state
                    .ontology
                    .add_axioms(query_rendered.transient_axioms.iter().cloned());
                state
                    .ontology
                    .add_axioms(instance_rendered.transient_axioms.iter().cloned());
                let outcome = self.base.reasoner.is_subsumed_by(
                    &state.ontology,
                    &instance_rendered.expression,
                    &query_rendered.expression,
                );
                state
                    .ontology
                    .remove_axioms(&instance_rendered.transient_axioms);
                state.ontology.remove_axioms(&query_rendered.transient_axioms);
                Ok(outcome?)
            },
            |_| None,
        )
    }

    fn contains(&self, identity: &Identity) -> bool {
        self.state.read().stored.contains_key(identity)
    }

    fn stored_len(&self) -> usize {
        self.state.read().stored.len()
    }
}
