//! Document configuration.

use ontic_core::{DiagnosticLevel, ModelError, ModelResult, Naming};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Text layout of serialized documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Compact,
    Indented,
}

/// Configuration of a [`crate::Factory`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Context pointer written at the root of every document.
    pub context_uri: Option<String>,
    /// URIs under this prefix map to files under `base_dir`.
    pub base_url: String,
    pub base_dir: Option<PathBuf>,
    pub naming: Naming,
    pub text: TextMode,
    pub filename_extension: String,
    pub diagnostics: DiagnosticLevel,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            context_uri: None,
            base_url: "http://lod.example.org/museum/".to_string(),
            base_dir: None,
            naming: Naming::Short,
            text: TextMode::Compact,
            filename_extension: ".json".to_string(),
            diagnostics: DiagnosticLevel::Warn,
        }
    }
}

impl DocumentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> ModelResult<Self> {
        serde_json::from_str(text).map_err(|e| {
            ModelError::configuration(format!("invalid document configuration: {}", e))
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_context_uri(mut self, uri: impl Into<String>) -> Self {
        self.context_uri = Some(uri.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_text(mut self, text: TextMode) -> Self {
        self.text = text;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.filename_extension = extension.into();
        self
    }

    pub fn with_diagnostics(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostics = level;
        self
    }
}
