//! Model configuration.

use ontic_core::{DiagnosticLevel, ModelError, ModelResult};
use serde::Deserialize;
use std::path::Path;

/// How identifiers are issued for entities created without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Blank node labels `b1`, `b2`, ... per graph.
    #[default]
    Blank,
    /// `<base_url><segment>/<n>` with a counter per segment.
    Counter,
    /// `<base_url><segment>/<uuid v4>`.
    Uuid,
}

/// What a second value for a single-valued property does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    /// Reject it with `TooManyValues`.
    Strict,
    /// Promote the slot to a list.
    #[default]
    Promote,
}

/// Configuration of a [`crate::Graph`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub id_scheme: IdScheme,
    pub validate_properties: bool,
    pub materialize_inverses: bool,
    pub multiplicity: Multiplicity,
    pub diagnostics: DiagnosticLevel,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://lod.example.org/museum/".to_string(),
            id_scheme: IdScheme::Blank,
            validate_properties: true,
            materialize_inverses: false,
            multiplicity: Multiplicity::Promote,
            diagnostics: DiagnosticLevel::Warn,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> ModelResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| ModelError::configuration(format!("invalid model configuration: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_id_scheme(mut self, scheme: IdScheme) -> Self {
        self.id_scheme = scheme;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_properties = validate;
        self
    }

    pub fn with_inverses(mut self, materialize: bool) -> Self {
        self.materialize_inverses = materialize;
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    pub fn with_diagnostics(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostics = level;
        self
    }
}
