//! Classification and instance matching over rendered frame graphs.
//!
//! This crate orchestrates the translation layer: resolve an instance graph
//! against the ontology, render it (as a class expression, or as an
//! individual network when the structure is cyclic or the configuration
//! forces it), put the question to the DL reasoner, and translate the
//! answer back to frame-model identities.
//!
//! - `config`: reasoning configuration, validated eagerly at construction
//! - `monitor`: an explicit observer registry — no process-wide statics
//! - `classify`: the classifier state machine (resolve → render → infer →
//!   suggest → cleanup)
//! - `matcher`: the three matcher variants behind one [`InstanceMatcher`]
//!   contract
//!
//! Requests execute synchronously on the calling thread. Matchers guard
//! their shared ontology state with a single lock across the whole
//! add/remove/match surface; the classifier borrows the ontology mutably
//! and needs no lock of its own.

pub mod classify;
pub mod config;
pub mod matcher;
pub mod monitor;

use ontoframe_owl::ReasonerError;
use ontoframe_render::{RenderError, ResolveError};

pub use classify::{Classification, Classifier, ClassifyOptions};
pub use config::{ConfigError, ReasoningConfig, RenderingPolicy};
pub use matcher::{
    ConceptMatcher, ExpressionMatcher, IndividualMatcher, InstanceMatcher,
};
pub use monitor::{MonitorId, MonitorRegistry, ReasoningMonitor};

#[derive(Debug, thiserror::Error)]
pub enum ReasonError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Reasoner(#[from] ReasonerError),
}
