//! The matcher family: store instances, answer containment queries.
//!
//! Three variants share one contract and differ only in how a stored
//! instance is represented:
//!
//! - [`ExpressionMatcher`] — in-memory class expressions; no per-instance
//!   ontology growth, every query re-tests each stored expression
//! - [`ConceptMatcher`] — ontology-linked named classes defined by the
//!   rendered expression; matching is one entailed-subsumption check per
//!   stored class
//! - [`IndividualMatcher`] — ontology-linked individual networks; matching
//!   is one instance-retrieval call, filtered to stored roots
//!
//! Queries always render as concept expressions, whatever the storage
//! representation. Every variant guards its store *and* its ontology behind
//! one lock across the whole add/remove/match surface, so interleaved calls
//! from multiple threads serialize instead of corrupting shared state.

mod concept;
mod expression;
mod individual;

pub use concept::ConceptMatcher;
pub use expression::ExpressionMatcher;
pub use individual::IndividualMatcher;

use crate::config::{ConfigError, ReasoningConfig};
use crate::monitor::MonitorRegistry;
use crate::ReasonError;
use ontoframe_model::{FrameSchema, Identity, InstanceGraph, NodeId};
use ontoframe_owl::{DlReasoner, Iri, Ontology};
use ontoframe_render::{EntityResolver, ExpressionRenderer, RenderedExpression};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Common contract across the matcher variants.
pub trait InstanceMatcher {
    /// Resolve, render, and retain `instance` under `identity`.
    ///
    /// Answers false without touching stored state when `identity` is
    /// already present.
    fn add(
        &self,
        instance: &InstanceGraph,
        root: NodeId,
        identity: Identity,
    ) -> Result<bool, ReasonError>;

    /// Retract whatever is stored under `identity`. Answers false when
    /// nothing is.
    fn remove(&self, identity: &Identity) -> bool;

    /// All stored identities whose representation is subsumed by the query.
    fn find_matches(
        &self,
        query: &InstanceGraph,
        root: NodeId,
    ) -> Result<BTreeSet<Identity>, ReasonError>;

    /// Single-pair test: does `instance` match `query`? Builds transient
    /// representations for both sides and discards them — nothing persists.
    fn matches(
        &self,
        query: &InstanceGraph,
        query_root: NodeId,
        instance: &InstanceGraph,
        instance_root: NodeId,
    ) -> Result<bool, ReasonError>;

    fn contains(&self, identity: &Identity) -> bool;

    fn stored_len(&self) -> usize;
}

/// Plumbing shared by the variants: schema, reasoner, configuration, and
/// monitor wiring.
pub(crate) struct MatcherBase<R> {
    pub schema: Arc<FrameSchema>,
    pub reasoner: R,
    pub config: ReasoningConfig,
    pub monitors: Arc<MonitorRegistry>,
}

impl<R: DlReasoner> MatcherBase<R> {
    pub fn new(
        schema: Arc<FrameSchema>,
        reasoner: R,
        config: ReasoningConfig,
        monitors: Arc<MonitorRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            schema,
            reasoner,
            config,
            monitors,
        })
    }

    /// Resolution followed by expression rendering — the query-side path for
    /// every variant, and the storage path for the expression/concept ones.
    pub fn resolve_and_render(
        &self,
        ontology: &Ontology,
        graph: &InstanceGraph,
        root: NodeId,
    ) -> Result<RenderedExpression, ReasonError> {
        let (resolved, resolved_root) =
            EntityResolver::new(&self.schema, ontology).resolve(graph, root)?;
        let semantics = self.config.semantics();
        let rendered = ExpressionRenderer::new(
            &self.schema,
            ontology,
            &semantics,
            &self.config.instance_namespace,
        )
        .render(&resolved, resolved_root)?;
        Ok(rendered)
    }

    /// Stable instance IRI for a store identity.
    pub fn instance_iri(&self, identity: &Identity) -> Iri {
        Iri::in_namespace(&self.config.instance_namespace, identity.as_str())
    }

    /// Run `f` bracketed by the matcher request/done monitor events,
    /// reporting the hit count when the operation yields one.
    pub fn with_match_monitors<T>(
        &self,
        f: impl FnOnce(u64) -> Result<T, ReasonError>,
        count: impl Fn(&T) -> Option<usize>,
    ) -> Result<T, ReasonError> {
        let request = self.monitors.next_request_id();
        self.monitors.notify(|m| m.on_match_start(request));
        let result = f(request);
        if let Ok(value) = &result {
            if let Some(found) = count(value) {
                self.monitors.notify(|m| m.on_matches_found(request, found));
            }
        }
        self.monitors.notify(|m| m.on_match_done(request));
        result
    }
}
