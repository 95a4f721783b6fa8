//! The entity arena.

use crate::identity::{IdAllocator, IdMinter};
use crate::ModelConfig;
use indexmap::IndexMap;
use ontic_core::{
    keys, Diagnostics, Entity, EntityId, Identity, ModelError, ModelResult, TypeId, Value,
};
use ontic_registry::{Registry, Usage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A graph of entities validated against one registry.
///
/// A graph is single-threaded state: identifier counters and the identity
/// index are mutated by every creation.
#[derive(Debug)]
pub struct Graph {
    registry: Arc<Registry>,
    config: ModelConfig,
    /// Entity storage in creation order.
    entities: IndexMap<EntityId, Entity>,
    /// Public identity to entity; the latest entity wins.
    identities: HashMap<Identity, EntityId>,
    ids: IdAllocator,
    minter: IdMinter,
    diagnostics: Diagnostics,
    /// Pre-images of entities changed since the innermost open checkpoint.
    journal: Option<Journal>,
}

/// Graph state to return to if a multi-step change fails.
///
/// Opened by [`Graph::checkpoint`] and closed by exactly one of
/// [`Graph::rollback`] or [`Graph::release`]. Checkpoints nest.
#[derive(Debug)]
#[must_use]
pub struct Checkpoint {
    identities: HashMap<Identity, EntityId>,
    ids: IdAllocator,
    minter: IdMinter,
    outer: Option<Journal>,
}

#[derive(Debug)]
struct Journal {
    /// Entity count when the checkpoint was opened.
    len: usize,
    before: HashMap<EntityId, Entity>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new(registry: Arc<Registry>, config: ModelConfig) -> Self {
        let minter = IdMinter::new(config.id_scheme, &config.base_url);
        let diagnostics = Diagnostics::new(config.diagnostics);
        Self {
            registry,
            config,
            entities: IndexMap::new(),
            identities: HashMap::new(),
            ids: IdAllocator::new(),
            minter,
            diagnostics,
            journal: None,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    // ==================== Entity Creation ====================

    /// Create an entity of a type, combination or vocabulary class.
    pub fn create(&mut self, type_name: &str) -> ModelResult<EntityId> {
        self.entity(type_name).create()
    }

    /// Start building an entity with optional identifier, label and content.
    pub fn entity<'g>(&'g mut self, type_name: &str) -> EntityBuilder<'g> {
        EntityBuilder {
            graph: self,
            type_name: type_name.to_string(),
            ident: None,
            label: None,
            content: None,
        }
    }

    /// Create an entity from resolved types, with a given identity or a minted one.
    pub fn create_typed(
        &mut self,
        types: Vec<TypeId>,
        identity: Option<Identity>,
    ) -> ModelResult<EntityId> {
        if types.is_empty() {
            return Err(ModelError::UnknownType("(no type)".to_string()));
        }
        let segment = self.segment(&types);
        for &type_id in &types {
            self.check_class_usage(type_id)?;
        }

        let identity = match identity {
            Some(identity) => identity,
            None => {
                let identities = &self.identities;
                self.minter
                    .mint(&segment, |candidate| identities.contains_key(candidate))
            }
        };

        let id = self.ids.alloc();
        debug!(entity = %id, identity = %identity, "created entity");
        self.identities.insert(identity.clone(), id);
        self.entities.insert(id, Entity::new(id, identity, types));
        self.classify(id)?;
        Ok(id)
    }

    /// Replace the types of an existing entity.
    pub fn retype(&mut self, id: EntityId, types: Vec<TypeId>) -> ModelResult<()> {
        for &type_id in &types {
            self.check_class_usage(type_id)?;
        }
        self.entity_mut(id)?.types = types;
        Ok(())
    }

    fn resolve_types(&self, type_name: &str) -> ModelResult<Vec<TypeId>> {
        if let Some(combination) = self.registry.combination(type_name) {
            return Ok(combination.types.clone());
        }
        self.registry
            .lookup_type(type_name)
            .map(|id| vec![id])
            .ok_or_else(|| ModelError::UnknownType(type_name.to_string()))
    }

    fn check_class_usage(&mut self, type_id: TypeId) -> ModelResult<()> {
        let node = self
            .registry
            .get_type(type_id)
            .ok_or_else(|| ModelError::UnknownType(type_id.to_string()))?;
        match node.usage {
            Usage::Allowed => Ok(()),
            Usage::Disallowed => Err(ModelError::profile_violation(format!("class '{}'", node.name))),
            Usage::Warn => {
                let name = node.name.clone();
                self.diagnostics
                    .report(name, "class is discouraged by the profile")
            }
        }
    }

    /// Attach the classification terms of a vocabulary class.
    fn classify(&mut self, id: EntityId) -> ModelResult<()> {
        let registry = Arc::clone(&self.registry);
        let types = self.entity_ref(id)?.types.clone();
        for type_id in types {
            let Some(classification) = registry
                .get_type(type_id)
                .and_then(|t| t.classification.as_ref())
            else {
                continue;
            };
            for term in &classification.terms {
                let term_entity = self.shared(classification.term_type, &term.uri, &term.label)?;
                self.set(id, &classification.property, term_entity)?;
            }
        }
        Ok(())
    }

    /// The entity registered under `name`, created on first request and
    /// reused by URI afterwards.
    pub fn instance(&mut self, name: &str) -> ModelResult<EntityId> {
        let registry = Arc::clone(&self.registry);
        let instance = registry
            .instance(name)
            .ok_or_else(|| ModelError::UnknownInstance(name.to_string()))?;
        self.shared(instance.type_id, &instance.uri, &instance.label)
    }

    /// Find the entity for a URI, or create it with a type and label.
    fn shared(&mut self, type_id: TypeId, uri: &str, label: &str) -> ModelResult<EntityId> {
        let identity = Identity::Uri(uri.to_string());
        if let Some(existing) = self.lookup(&identity) {
            return Ok(existing);
        }
        let created = self.create_typed(vec![type_id], Some(identity))?;
        self.set(created, keys::LABEL, label)?;
        Ok(created)
    }

    // ==================== Lookups ====================

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn entity_ref(&self, id: EntityId) -> ModelResult<&Entity> {
        self.entities.get(&id).ok_or(ModelError::EntityNotFound(id))
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> ModelResult<&mut Entity> {
        if let Some(journal) = &mut self.journal {
            if let Some((index, _, entity)) = self.entities.get_full(&id) {
                if index < journal.len && !journal.before.contains_key(&id) {
                    journal.before.insert(id, entity.clone());
                }
            }
        }
        self.entities
            .get_mut(&id)
            .ok_or(ModelError::EntityNotFound(id))
    }

    /// Get an attribute value.
    pub fn attr(&self, id: EntityId, name: &str) -> Option<&Value> {
        self.get(id).and_then(|e| e.get_attr(name))
    }

    /// Find the entity carrying a public identity.
    pub fn lookup(&self, identity: &Identity) -> Option<EntityId> {
        self.identities.get(identity).copied()
    }

    pub fn identity(&self, id: EntityId) -> Option<&Identity> {
        self.get(id).map(|e| &e.identity)
    }

    /// Entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Names documents show for the entity's types (vocabulary classes
    /// render as their ontology class).
    pub fn type_names(&self, id: EntityId) -> Vec<String> {
        self.get(id)
            .map(|e| {
                e.types
                    .iter()
                    .filter_map(|t| self.registry.rendered_type(*t))
                    .map(|t| t.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Name of the primary type, for messages.
    pub fn primary_name(&self, id: EntityId) -> String {
        self.type_names(id)
            .into_iter()
            .next()
            .unwrap_or_else(|| keys::ROOT_CLASS_NAME.to_string())
    }

    /// True when some type of the entity is `ancestor` or one of its descendants.
    pub fn is_instance(&self, id: EntityId, ancestor: TypeId) -> bool {
        self.get(id)
            .map(|e| e.types.iter().any(|t| self.registry.is_subtype(*t, ancestor)))
            .unwrap_or(false)
    }

    // ==================== Identity ====================

    /// Replace an entity's identity with an explicit identifier.
    pub fn set_identity(&mut self, id: EntityId, ident: &str) -> ModelResult<()> {
        let segment = self.segment(&self.entity_ref(id)?.types);
        let identity = self.minter.explicit(&segment, ident);
        let previous = std::mem::replace(&mut self.entity_mut(id)?.identity, identity.clone());
        if self.identities.get(&previous) == Some(&id) {
            self.identities.remove(&previous);
        }
        self.identities.insert(identity, id);
        Ok(())
    }

    /// URI path segment for a type list: the combination's, else the primary type's.
    // ==================== Checkpoints ====================

    /// Start recording changes so they can be undone as one unit.
    pub fn checkpoint(&mut self) -> Checkpoint {
        let outer = self.journal.replace(Journal {
            len: self.entities.len(),
            before: HashMap::new(),
        });
        Checkpoint {
            identities: self.identities.clone(),
            ids: self.ids.clone(),
            minter: self.minter.clone(),
            outer,
        }
    }

    /// Undo everything since `checkpoint`: entities created since are
    /// dropped, changed entities and the identity index are restored.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        if let Some(journal) = std::mem::replace(&mut self.journal, checkpoint.outer) {
            debug!(
                dropped = self.entities.len().saturating_sub(journal.len),
                restored = journal.before.len(),
                "rolled back to checkpoint"
            );
            self.entities.truncate(journal.len);
            for (id, entity) in journal.before {
                if let Some(slot) = self.entities.get_mut(&id) {
                    *slot = entity;
                }
            }
        }
        self.identities = checkpoint.identities;
        self.ids = checkpoint.ids;
        self.minter = checkpoint.minter;
    }

    /// Keep everything since `checkpoint`.
    pub fn release(&mut self, checkpoint: Checkpoint) {
        let inner = std::mem::replace(&mut self.journal, checkpoint.outer);
        // An enclosing checkpoint still needs the oldest pre-images
        if let (Some(outer), Some(inner)) = (&mut self.journal, inner) {
            for (id, entity) in inner.before {
                let existed = self
                    .entities
                    .get_index_of(&id)
                    .is_some_and(|index| index < outer.len);
                if existed {
                    outer.before.entry(id).or_insert(entity);
                }
            }
        }
    }

    fn segment(&self, types: &[TypeId]) -> String {
        self.registry
            .combination_for(types)
            .map(|c| c.segment.clone())
            .or_else(|| {
                types
                    .first()
                    .and_then(|t| self.registry.get_type(*t))
                    .map(|t| t.segment.clone())
            })
            .unwrap_or_else(|| keys::ROOT_CLASS_NAME.to_string())
    }
}

/// Builder for a new entity.
pub struct EntityBuilder<'g> {
    graph: &'g mut Graph,
    type_name: String,
    ident: Option<String>,
    label: Option<String>,
    content: Option<Value>,
}

impl<'g> EntityBuilder<'g> {
    /// Explicit identifier: absolute IRIs are kept, others join the base URL.
    pub fn ident(mut self, ident: impl Into<String>) -> Self {
        self.ident = Some(ident.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Content assigned to the `value` property.
    pub fn content(mut self, content: impl Into<Value>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn create(self) -> ModelResult<EntityId> {
        let types = self.graph.resolve_types(&self.type_name)?;
        let identity = self.ident.as_deref().map(|ident| {
            let segment = self.graph.segment(&types);
            self.graph.minter.explicit(&segment, ident)
        });
        let id = self.graph.create_typed(types, identity)?;
        if let Some(label) = self.label {
            self.graph.set(id, keys::LABEL, label)?;
        }
        if let Some(content) = self.content {
            self.graph.set(id, keys::VALUE, content)?;
        }
        Ok(id)
    }
}
