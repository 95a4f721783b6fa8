//! Ontic Tests
//!
//! Shared fixtures for scenario-level tests: the museum schema and its
//! context document, plus helpers that wire a registry, graph and factory
//! together.

use ontic_compiler::{CompileError, ContextDocument};
use ontic_document::{DocumentConfig, Factory};
use ontic_graph::{Graph, ModelConfig};
use ontic_registry::{Registry, RegistryError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub mod prelude {
    pub use crate::{fixture_path, Museum, CONTEXT_URI};
    pub use ontic_compiler::ContextDocument;
    pub use ontic_core::{DiagnosticLevel, EntityId, Identity, ModelError, Naming, Value};
    pub use ontic_document::{
        ClassBoundaryPolicy, DocumentConfig, EmbedAll, Factory, TextMode,
    };
    pub use ontic_graph::{Graph, IdScheme, ModelConfig, Multiplicity};
    pub use ontic_registry::Registry;
    pub use serde_json::json;
}

/// Context pointer written into every fixture document.
pub const CONTEXT_URI: &str = "https://linked.art/ns/v1/linked-art.json";

/// Failures while loading fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Context error: {0}")]
    Context(#[from] CompileError),
}

pub type FixtureResult<T> = Result<T, FixtureError>;

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// The museum fixture: registry, context and default configurations.
pub struct Museum {
    registry: Arc<Registry>,
    context: ContextDocument,
}

impl Museum {
    /// Load the schema and context, registering the fixture's combination.
    pub fn load() -> FixtureResult<Self> {
        Self::load_with(|_| Ok(()))
    }

    /// Load, then adjust the registry before it is shared.
    pub fn load_with(
        setup: impl FnOnce(&mut Registry) -> Result<(), RegistryError>,
    ) -> FixtureResult<Self> {
        let mut registry = Registry::load(fixture_path("museum.tsv"))?;
        registry.register_combination(
            "DestructionActivity",
            "Activity",
            &["Destruction", "Activity"],
        )?;
        setup(&mut registry)?;
        let context = ContextDocument::from_path(fixture_path("context.json"))?;
        Ok(Self {
            registry: Arc::new(registry),
            context,
        })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn context(&self) -> &ContextDocument {
        &self.context
    }

    /// A fresh graph with the default model configuration.
    pub fn graph(&self) -> Graph {
        self.graph_with(ModelConfig::default())
    }

    pub fn graph_with(&self, config: ModelConfig) -> Graph {
        Graph::new(Arc::clone(&self.registry), config)
    }

    /// Document configuration carrying the fixture context pointer.
    pub fn document_config(&self) -> DocumentConfig {
        DocumentConfig::new().with_context_uri(CONTEXT_URI)
    }

    /// An embed-everything factory that knows the fixture context.
    pub fn factory(&self) -> Factory {
        self.factory_with(self.document_config())
    }

    pub fn factory_with(&self, config: DocumentConfig) -> Factory {
        Factory::new(config).with_context(self.context.clone())
    }
}
