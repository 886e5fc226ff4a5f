//! The classifier: resolve → render → infer → suggest → cleanup.
//!
//! One request runs the whole pipeline on the calling thread. The rendering
//! path is chosen per request: concept expressions by default, individual
//! networks when the resolved graph is cyclic or the configuration forces
//! them. Cleanup — retraction of every transient axiom this request added —
//! runs on every path, including failures, and the monitors' done callback
//! fires exactly once per request regardless of which sub-operations ran.
//!
//! Reasoner failures are not caught here; they propagate to the caller.

use crate::config::{ConfigError, ReasoningConfig, RenderingPolicy};
use crate::monitor::MonitorRegistry;
use crate::ReasonError;
use ontoframe_model::{FrameSchema, Identity, InstanceGraph, NodeId};
use ontoframe_owl::{DlReasoner, Iri, Ontology};
use ontoframe_render::{EntityResolver, ExpressionRenderer, IndividualRenderer};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    /// Also ask for candidate sub-types. Only meaningful on the expression
    /// path; individual networks do not support type suggestion.
    pub suggest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Types entailed for the instance beyond those already asserted on it.
    pub inferred: BTreeSet<Identity>,
    /// Candidate specializations of the instance's description.
    pub suggested: BTreeSet<Identity>,
}

pub struct Classifier<R> {
    schema: Arc<FrameSchema>,
    reasoner: R,
    config: ReasoningConfig,
    monitors: Arc<MonitorRegistry>,
}

impl<R: DlReasoner> Classifier<R> {
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

    /// Classify one instance against the ontology.
    ///
    /// Transient axioms (reference-individual declarations, or the whole
    /// individual network on the cyclic path) live in `ontology` only for
    /// the duration of this call.
    pub fn classify(
        &self,
        ontology: &mut Ontology,
        graph: &InstanceGraph,
        root: NodeId,
        options: ClassifyOptions,
    ) -> Result<Classification, ReasonError> {
        let request = self.monitors.next_request_id();
        self.monitors.notify(|m| m.on_classify_start(request));
        let result = self.classify_inner(ontology, graph, root, options, request);
        self.monitors.notify(|m| m.on_classify_done(request));
        result
    }

    fn classify_inner(
        &self,
        ontology: &mut Ontology,
        graph: &InstanceGraph,
        root: NodeId,
        options: ClassifyOptions,
        request: u64,
    ) -> Result<Classification, ReasonError> {
        let (resolved, resolved_root) =
            EntityResolver::new(&self.schema, ontology).resolve(graph, root)?;
        let asserted = self.asserted_identities(&resolved, resolved_root);

        let use_individuals = self.config.rendering == RenderingPolicy::ForceIndividuals
            || resolved.has_cycle(resolved_root);
        if use_individuals {
            tracing::debug!(request, "classifying via individual network");
            self.classify_as_individual(ontology, &resolved, resolved_root, &asserted, request)
        } else {
            self.classify_as_expression(
                ontology,
                &resolved,
                resolved_root,
                &asserted,
                options,
                request,
            )
        }
    }

    fn classify_as_expression(
        &self,
        ontology: &mut Ontology,
        resolved: &InstanceGraph,
        root: NodeId,
        asserted: &BTreeSet<Identity>,
        options: ClassifyOptions,
        request: u64,
    ) -> Result<Classification, ReasonError> {
        let semantics = self.config.semantics();
        let rendered = ExpressionRenderer::new(
            &self.schema,
            ontology,
            &semantics,
            &self.config.instance_namespace,
        )
        .render(resolved, root)?;

        ontology.add_axioms(rendered.transient_axioms.iter().cloned());
        let outcome: Result<Classification, ReasonError> = (|| {
            let mut entailed = self
                .reasoner
                .equivalent_classes(ontology, &rendered.expression)?;
            entailed.extend(
                self.reasoner
                    .super_classes(ontology, &rendered.expression, true)?,
            );
            let inferred = self.translate_minus(entailed, asserted);
            self.monitors
                .notify(|m| m.on_types_inferred(request, &inferred));

            let suggested = if options.suggest {
                let subs = self
                    .reasoner
                    .sub_classes(ontology, &rendered.expression, true)?;
                let suggested = self.translate_minus(subs, &BTreeSet::new());
                self.monitors
                    .notify(|m| m.on_types_suggested(request, &suggested));
                suggested
            } else {
                BTreeSet::new()
            };

            Ok(Classification {
                inferred,
                suggested,
            })
        })();
        ontology.remove_axioms(&rendered.transient_axioms);
        outcome
    }

    fn classify_as_individual(
        &self,
        ontology: &mut Ontology,
        resolved: &InstanceGraph,
        root: NodeId,
        asserted: &BTreeSet<Identity>,
        request: u64,
    ) -> Result<Classification, ReasonError> {
        let semantics = self.config.semantics();
        let root_iri = Iri::in_namespace(
            &self.config.instance_namespace,
            &format!("classify-request-{request}"),
        );
        let group = IndividualRenderer::new(
            &self.schema,
            ontology,
            &semantics,
            &self.config.instance_namespace,
        )
        .render(resolved, root, root_iri)?;

        ontology.add_axioms(group.axioms.iter().cloned());
        let outcome: Result<Classification, ReasonError> = (|| {
            let types = self.reasoner.types_of(ontology, &group.root, true)?;
            let inferred = self.translate_minus(types, asserted);
            self.monitors
                .notify(|m| m.on_types_inferred(request, &inferred));
            // No suggestion pass: an individual network has no expression to
            // specialize.
            Ok(Classification {
                inferred,
                suggested: BTreeSet::new(),
            })
        })();
        ontology.remove_axioms(&group.axioms);
        outcome
    }

    /// Translate reasoner-reported classes back to frame identities,
    /// dropping classes with no frame counterpart and the already-asserted
    /// identities.
    fn translate_minus(
        &self,
        classes: BTreeSet<Iri>,
        asserted: &BTreeSet<Identity>,
    ) -> BTreeSet<Identity> {
        classes
            .iter()
            .filter_map(|iri| self.schema.concept_for_class(iri))
            .filter(|identity| !asserted.contains(identity))
            .cloned()
            .collect()
    }

    /// The type identities already asserted on the instance root.
    fn asserted_identities(&self, resolved: &InstanceGraph, root: NodeId) -> BTreeSet<Identity> {
        resolved
            .node(root)
            .typing
            .disjuncts()
            .iter()
            .cloned()
            .collect()
    }
}
