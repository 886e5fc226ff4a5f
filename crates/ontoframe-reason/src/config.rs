//! Reasoning configuration.
//!
//! Deserialized from JSON and validated *before* any classifier or matcher
//! is built — a malformed configuration must fail at construction, never in
//! the middle of a request.

use ontoframe_owl::Iri;
use ontoframe_render::{PropertySemantics, World};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse reasoning config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("world exception IRIs must not be empty")]
    EmptyException,
    #[error("duplicate world exception: {0}")]
    DuplicateException(Iri),
    #[error("instance namespace must not be empty")]
    EmptyNamespace,
}

/// How instances are rendered for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderingPolicy {
    /// Concept expressions, falling back to individual networks for cyclic
    /// graphs.
    #[default]
    Auto,
    /// Always render individual networks.
    ForceIndividuals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReasoningConfig {
    /// The world applied to every property not covered by an exception.
    pub default_world: World,
    /// Properties (and, transitively, their sub-properties) whose world is
    /// the flipped default.
    #[serde(default)]
    pub world_exceptions: Vec<Iri>,
    #[serde(default)]
    pub rendering: RenderingPolicy,
    /// Namespace for minted instance and reference-individual IRIs.
    #[serde(default = "default_instance_namespace")]
    pub instance_namespace: String,
}

fn default_instance_namespace() -> String {
    "http://ontoframe.org/instances#".to_string()
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            default_world: World::Open,
            world_exceptions: Vec::new(),
            rendering: RenderingPolicy::default(),
            instance_namespace: default_instance_namespace(),
        }
    }
}

impl ReasoningConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ReasoningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        for (i, exception) in self.world_exceptions.iter().enumerate() {
            if exception.as_str().is_empty() {
                return Err(ConfigError::EmptyException);
            }
            if self.world_exceptions[..i].contains(exception) {
                return Err(ConfigError::DuplicateException(exception.clone()));
            }
        }
        Ok(())
    }

    pub fn semantics(&self) -> PropertySemantics {
        PropertySemantics::with_exceptions(self.default_world, self.world_exceptions.clone())
    }
}
