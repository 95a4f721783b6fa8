//! Document factory: serializer and deserializer front end.

use crate::{BoundaryPolicy, Deserializer, DocumentConfig, EmbedAll, Serializer, TextMode};
use ontic_compiler::ContextDocument;
use ontic_core::{Diagnostics, EntityId, Identity, ModelError, ModelResult};
use ontic_graph::Graph;
use serde_json::Value as JsonValue;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Turns entities into documents and documents back into entities.
pub struct Factory {
    config: DocumentConfig,
    policy: Box<dyn BoundaryPolicy>,
    context: Option<ContextDocument>,
    diagnostics: Diagnostics,
}

impl Factory {
    /// A factory that embeds every reachable entity.
    pub fn new(config: DocumentConfig) -> Self {
        let diagnostics = Diagnostics::new(config.diagnostics);
        Self {
            config,
            policy: Box::new(EmbedAll),
            context: None,
            diagnostics,
        }
    }

    pub fn with_policy(mut self, policy: impl BoundaryPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Context used to render and read full names.
    pub fn with_context(mut self, context: ContextDocument) -> Self {
        self.context = Some(context);
        self
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    // ==================== Output ====================

    /// Serialize the document rooted at `root`.
    pub fn to_json(&mut self, graph: &Graph, root: EntityId) -> ModelResult<JsonValue> {
        Serializer::new(graph, &self.config, self.policy.as_ref(), &mut self.diagnostics)
            .with_context(self.context.as_ref())
            .serialize(root)
    }

    /// Serialize to text, compact or indented per configuration.
    pub fn to_string(&mut self, graph: &Graph, root: EntityId) -> ModelResult<String> {
        let document = self.to_json(graph, root)?;
        let text = match self.config.text {
            TextMode::Compact => serde_json::to_string(&document),
            TextMode::Indented => serde_json::to_string_pretty(&document),
        };
        text.map_err(|e| ModelError::configuration(format!("cannot render document: {}", e)))
    }

    /// Write the document to `base_dir` under the path its identifier has
    /// below `base_url`, and return that path.
    pub fn to_file(&mut self, graph: &Graph, root: EntityId) -> ModelResult<PathBuf> {
        let path = self.file_path(graph, root)?;
        let text = self.to_string(graph, root)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, text)?;
        info!(path = %path.display(), "wrote document");
        Ok(path)
    }

    fn file_path(&self, graph: &Graph, root: EntityId) -> ModelResult<PathBuf> {
        let base_dir = self
            .config
            .base_dir
            .as_ref()
            .ok_or_else(|| ModelError::configuration("no base directory configured"))?;
        let uri = match graph.identity(root) {
            Some(Identity::Uri(uri)) => uri,
            Some(blank @ Identity::Blank(_)) => {
                return Err(ModelError::configuration(format!(
                    "cannot place '{}' on disk: blank identifier",
                    blank
                )))
            }
            None => return Err(ModelError::EntityNotFound(root)),
        };
        let relative = uri
            .strip_prefix(self.config.base_url.as_str())
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| {
                ModelError::configuration(format!(
                    "'{}' is not under base URL '{}'",
                    uri, self.config.base_url
                ))
            })?;
        let relative = Path::new(relative.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ModelError::configuration(format!(
                "'{}' does not map to a path inside the base directory",
                uri
            )));
        }
        let mut file = relative.as_os_str().to_os_string();
        file.push(&self.config.filename_extension);
        Ok(base_dir.join(file))
    }

    // ==================== Input ====================

    /// Parse document text into `graph` and return the root entity.
    pub fn read(&mut self, graph: &mut Graph, text: &str) -> ModelResult<EntityId> {
        if text.trim().is_empty() {
            return Err(ModelError::malformed("empty document"));
        }
        let document: JsonValue = serde_json::from_str(text)
            .map_err(|e| ModelError::malformed(format!("invalid JSON: {}", e)))?;
        self.read_value(graph, &document)
    }

    /// Read an already parsed document into `graph`.
    pub fn read_value(&mut self, graph: &mut Graph, document: &JsonValue) -> ModelResult<EntityId> {
        Deserializer::new(graph, &mut self.diagnostics)
            .with_context(self.context.as_ref())
            .read(document)
    }
}
