//! Embed-vs-reference decisions during serialization.

use ontic_core::{EntityId, ModelError, ModelResult, TypeId};
use ontic_graph::Graph;
use ontic_registry::Registry;
use std::collections::HashSet;

/// Decides, per edge, whether a target entity is embedded in the document
/// or left as a reference stub.
pub trait BoundaryPolicy {
    /// `root` is the entity the document is about; `edge` is the property
    /// through which `target` is reached.
    fn embed(&self, graph: &Graph, root: EntityId, edge: &str, target: EntityId) -> bool;
}

/// Embed everything: one self-contained document per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbedAll;

impl BoundaryPolicy for EmbedAll {
    fn embed(&self, _graph: &Graph, _root: EntityId, _edge: &str, _target: EntityId) -> bool {
        true
    }
}

/// Class- and edge-based boundaries for networks of linked documents.
///
/// Checked in order: the root itself is always a reference; downward edges
/// embed; upward edges reference; reference types reference; embed types
/// embed; anything else takes the default.
#[derive(Debug, Clone)]
pub struct ClassBoundaryPolicy {
    embed_types: Vec<TypeId>,
    reference_types: Vec<TypeId>,
    downward_edges: HashSet<String>,
    upward_edges: HashSet<String>,
    default_embed: bool,
}

impl ClassBoundaryPolicy {
    pub fn builder() -> ClassBoundaryBuilder {
        ClassBoundaryBuilder::default()
    }

    fn is_any(graph: &Graph, target: EntityId, types: &[TypeId]) -> bool {
        types.iter().any(|t| graph.is_instance(target, *t))
    }
}

impl BoundaryPolicy for ClassBoundaryPolicy {
    fn embed(&self, graph: &Graph, root: EntityId, edge: &str, target: EntityId) -> bool {
        if target == root {
            return false;
        }
        if self.downward_edges.contains(edge) {
            return true;
        }
        if self.upward_edges.contains(edge) {
            return false;
        }
        if Self::is_any(graph, target, &self.reference_types) {
            return false;
        }
        if Self::is_any(graph, target, &self.embed_types) {
            return true;
        }
        self.default_embed
    }
}

/// Builder for [`ClassBoundaryPolicy`]. Starts with `part`/`member` as
/// downward edges and `part_of`/`member_of` as upward edges.
#[derive(Debug, Clone)]
pub struct ClassBoundaryBuilder {
    embed_types: Vec<String>,
    reference_types: Vec<String>,
    downward_edges: HashSet<String>,
    upward_edges: HashSet<String>,
    default_embed: bool,
}

impl Default for ClassBoundaryBuilder {
    fn default() -> Self {
        Self {
            embed_types: Vec::new(),
            reference_types: Vec::new(),
            downward_edges: ["part", "member"].iter().map(|s| s.to_string()).collect(),
            upward_edges: ["part_of", "member_of"].iter().map(|s| s.to_string()).collect(),
            default_embed: true,
        }
    }
}

impl ClassBoundaryBuilder {
    /// Types (and their descendants) always embedded.
    pub fn embed_types(mut self, names: &[&str]) -> Self {
        self.embed_types.extend(names.iter().map(|s| s.to_string()));
        self
    }

    /// Types (and their descendants) always referenced.
    pub fn reference_types(mut self, names: &[&str]) -> Self {
        self.reference_types
            .extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn downward_edges(mut self, names: &[&str]) -> Self {
        self.downward_edges = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn upward_edges(mut self, names: &[&str]) -> Self {
        self.upward_edges = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn default_embed(mut self, embed: bool) -> Self {
        self.default_embed = embed;
        self
    }

    /// Resolve type names against a registry.
    pub fn build(self, registry: &Registry) -> ModelResult<ClassBoundaryPolicy> {
        let resolve = |names: &[String]| -> ModelResult<Vec<TypeId>> {
            names
                .iter()
                .map(|n| {
                    registry
                        .lookup_type(n)
                        .ok_or_else(|| ModelError::UnknownType(n.clone()))
                })
                .collect()
        };
        Ok(ClassBoundaryPolicy {
            embed_types: resolve(&self.embed_types)?,
            reference_types: resolve(&self.reference_types)?,
            downward_edges: self.downward_edges,
            upward_edges: self.upward_edges,
            default_embed: self.default_embed,
        })
    }
}
