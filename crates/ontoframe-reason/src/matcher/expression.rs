//! Purely in-memory matcher over rendered class expressions.
//!
//! Stored instances live as expressions in this process, not as axioms in
//! the reasoner's ontology — the trade is no persistent ontology growth
//! against re-testing every stored expression per query. Reference-node
//! declarations emitted while rendering a stored instance stay in the
//! ontology for the lifetime of the entry and are retracted on removal.

use super::{InstanceMatcher, MatcherBase};
use crate::config::{ConfigError, ReasoningConfig};
use crate::monitor::MonitorRegistry;
use crate::ReasonError;
use ontoframe_model::{FrameSchema, Identity, InstanceGraph, NodeId};
use ontoframe_owl::{Axiom, ClassExpression, DlReasoner, Ontology};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

struct StoredExpression {
    expression: ClassExpression,
    /// Reference-individual declarations kept alive with the entry.
    axioms: Vec<Axiom>,
}

struct State {
    ontology: Ontology,
    stored: BTreeMap<Identity, StoredExpression>,
}

pub struct ExpressionMatcher<R> {
    base: MatcherBase<R>,
    state: RwLock<State>,
}

impl<R: DlReasoner> ExpressionMatcher<R> {
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
}

impl<R: DlReasoner> InstanceMatcher for ExpressionMatcher<R> {
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
        state
            .ontology
            .add_axioms(rendered.transient_axioms.iter().cloned());
        state.stored.insert(
            identity,
            StoredExpression {
                expression: rendered.expression,
                axioms: rendered.transient_axioms,
            },
        );
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
                        if self.base.reasoner.is_subsumed_by(
                            &state.ontology,
                            &entry.expression,
                            &rendered.expression,
                        )? {
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
