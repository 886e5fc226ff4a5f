//! Ontology-linked matcher over individual networks.
//!
//! Each stored instance materializes as a named individual network through
//! the group store, so cyclic instances are first-class here. Matching a
//! query is one instance-retrieval call against the live ontology, filtered
//! to stored roots. Because reference-node IRIs and stored-instance roots
//! mint from the same namespace, an instance that references identity "X"
//! links straight onto the stored network of "X".

use super::{InstanceMatcher, MatcherBase};
use crate::config::{ConfigError, ReasoningConfig};
use crate::monitor::MonitorRegistry;
use crate::ReasonError;
use ontoframe_model::{FrameSchema, Identity, InstanceGraph, NodeId};
use ontoframe_owl::{Axiom, DlReasoner, Iri, Ontology};
use ontoframe_render::{EntityResolver, GroupStore, IndividualGroup, IndividualRenderer};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

struct State {
    ontology: Ontology,
    groups: GroupStore,
    stored: BTreeMap<Identity, Iri>,
}

pub struct IndividualMatcher<R> {
    base: MatcherBase<R>,
    state: RwLock<State>,
}

impl<R: DlReasoner> IndividualMatcher<R> {
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
                groups: GroupStore::new(),
                stored: BTreeMap::new(),
            }),
        })
    }

    /// Resolve and render an instance as a network rooted at `root_iri`.
    fn render_group(
        &self,
        ontology: &Ontology,
        instance: &InstanceGraph,
        root: NodeId,
        root_iri: Iri,
    ) -> Result<IndividualGroup, ReasonError> {
        let (resolved, resolved_root) =
            EntityResolver::new(&self.base.schema, ontology).resolve(instance, root)?;
        let semantics = self.base.config.semantics();
        let group = IndividualRenderer::new(
            &self.base.schema,
            ontology,
            &semantics,
            &self.base.config.instance_namespace,
        )
        .render(&resolved, resolved_root, root_iri)?;
        Ok(group)
    }
}

impl<R: DlReasoner> InstanceMatcher for IndividualMatcher<R> {
    fn add(
        &self,
        instance: &InstanceGraph,
        root: NodeId,
        identity: Identity,
    ) -> Result<bool, ReasonError> {
        let mut state = self.state.write();
        let state = &mut *state;
        if state.stored.contains_key(&identity) {
            tracing::debug!(%identity, "duplicate add ignored");
            return Ok(false);
        }
        let root_iri = self.base.instance_iri(&identity);
        let group = self.render_group(&state.ontology, instance, root, root_iri.clone())?;
        if !state.groups.insert(&mut state.ontology, group) {
            tracing::warn!(%identity, root = %root_iri, "group root already present");
            return Ok(false);
        }
        state.stored.insert(identity, root_iri);
        Ok(true)
    }

    fn remove(&self, identity: &Identity) -> bool {
        let mut state = self.state.write();
        let state = &mut *state;
        let Some(root) = state.stored.remove(identity) else {
            return false;
        };
        state.groups.remove(&mut state.ontology, &root)
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
                    let instances = self
                        .base
                        .reasoner
                        .instances_of(&state.ontology, &rendered.expression)?;
                    Ok(state
                        .stored
                        .iter()
                        .filter(|(_, root_iri)| instances.contains(root_iri))
                        .map(|(identity, _)| identity.clone())
                        .collect())
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
            |request| {
                let mut state = self.state.write();
                let state = &mut *state;
                let rendered =
                    self.base.resolve_and_render(&state.ontology, query, query_root)?;
                let transient_root = Iri::in_namespace(
                    &self.base.config.instance_namespace,
                    &format!("match-request-{request}"),
                );
                let group = self.render_group(
                    &state.ontology,
                    instance,
                    instance_root,
                    transient_root.clone(),
                )?;

                state
                    .ontology
                    .add_axioms(rendered.transient_axioms.iter().cloned());
                state.ontology.add_axioms(group.axioms.iter().cloned());
                let outcome = self.base.reasoner.is_entailed(
                    &state.ontology,
                    &Axiom::ClassAssertion {
                        class: rendered.expression.clone(),
                        individual: transient_root,
                    },
                );
                state.ontology.remove_axioms(&group.axioms);
                state.ontology.remove_axioms(&rendered.transient_axioms);
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
