//! Entity graph to nested document.
//!
//! One pass expands each entity at most once. An entity referenced from
//! several places is claimed by the first expanding parent that decides to
//! embed it (claims are made for all of a parent's edges before any child
//! is expanded); every other occurrence becomes a stub. Claims that end up
//! unused are released so a later parent can still expand the entity.

use crate::literal::literal_to_json;
use crate::{BoundaryPolicy, DocumentConfig};
use ontic_compiler::ContextDocument;
use ontic_core::{keys, Diagnostics, Entity, EntityId, ModelError, ModelResult, Naming, Value};
use ontic_graph::Graph;
use serde_json::{Map, Value as JsonValue};
use std::collections::{HashMap, HashSet};

type Entries = Vec<(String, JsonValue)>;

/// Per-call serialization state.
pub struct Serializer<'a> {
    graph: &'a Graph,
    config: &'a DocumentConfig,
    policy: &'a dyn BoundaryPolicy,
    context: Option<&'a ContextDocument>,
    diagnostics: &'a mut Diagnostics,
    /// Entities already fully expanded in this pass.
    expanded: HashSet<EntityId>,
    /// Entity to the parent that claimed its full expansion.
    owners: HashMap<EntityId, EntityId>,
}

impl<'a> Serializer<'a> {
    pub fn new(
        graph: &'a Graph,
        config: &'a DocumentConfig,
        policy: &'a dyn BoundaryPolicy,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            graph,
            config,
            policy,
            context: None,
            diagnostics,
            expanded: HashSet::new(),
            owners: HashMap::new(),
        }
    }

    /// Use a context for full-name rendering.
    pub fn with_context(mut self, context: Option<&'a ContextDocument>) -> Self {
        self.context = context;
        self
    }

    /// Serialize the document rooted at `root`.
    pub fn serialize(mut self, root: EntityId) -> ModelResult<JsonValue> {
        let context_uri = self
            .config
            .context_uri
            .clone()
            .ok_or_else(|| ModelError::configuration("no context URI configured"))?;

        let mut entries = self.expand(root, root)?;
        entries.push((
            keys::CONTEXT_KEY.to_string(),
            JsonValue::String(context_uri),
        ));
        Ok(self.finish(entries))
    }

    fn expand(&mut self, id: EntityId, root: EntityId) -> ModelResult<Entries> {
        if self.expanded.contains(&id) {
            return self.stub(id);
        }
        self.expanded.insert(id);

        let graph = self.graph;
        let entity = graph.get(id).ok_or(ModelError::EntityNotFound(id))?;
        self.check_profile(entity)?;

        let fields: Vec<(&String, &Value)> = entity
            .attributes
            .iter()
            .filter(|(name, value)| !value.is_empty() && !keys::is_internal(name))
            .collect();

        // Claim every embeddable child before expanding any of them
        let mut claims = Vec::new();
        for (name, value) in &fields {
            for target in value.entities() {
                if !self.expanded.contains(&target)
                    && !self.owners.contains_key(&target)
                    && self.policy.embed(graph, root, name, target)
                {
                    self.owners.insert(target, id);
                    claims.push(target);
                }
            }
        }

        let mut entries = self.header(entity);
        for (name, value) in fields {
            let rendered = match value {
                Value::List(items) => JsonValue::Array(
                    items
                        .iter()
                        .map(|item| self.render_item(id, root, name, item))
                        .collect::<ModelResult<Vec<_>>>()?,
                ),
                single => self.render_item(id, root, name, single)?,
            };
            entries.push((self.property_key(entity, name), rendered));
        }

        for claimed in claims {
            if !self.expanded.contains(&claimed) && self.owners.get(&claimed) == Some(&id) {
                self.owners.remove(&claimed);
            }
        }
        Ok(entries)
    }

    fn render_item(
        &mut self,
        owner: EntityId,
        root: EntityId,
        edge: &str,
        item: &Value,
    ) -> ModelResult<JsonValue> {
        match item {
            Value::Entity(target) => {
                let target = *target;
                let entries = if self.owners.get(&target) == Some(&owner)
                    && !self.expanded.contains(&target)
                    && self.policy.embed(self.graph, root, edge, target)
                {
                    self.expand(target, root)?
                } else {
                    self.stub(target)?
                };
                Ok(self.finish(entries))
            }
            Value::List(items) => Ok(JsonValue::Array(
                items
                    .iter()
                    .map(|i| self.render_item(owner, root, edge, i))
                    .collect::<ModelResult<Vec<_>>>()?,
            )),
            literal => Ok(literal_to_json(literal)),
        }
    }

    /// Required attributes must be present; recommended ones are reported.
    fn check_profile(&mut self, entity: &Entity) -> ModelResult<()> {
        let graph = self.graph;
        let registry = graph.registry();
        let present = |name: &str| entity.attributes.get(name).is_some_and(|v| !v.is_empty());
        for &type_id in &entity.types {
            if let Some(missing) = registry.required(type_id).into_iter().find(|n| !present(*n)) {
                return Err(ModelError::MissingRequiredProperty {
                    type_name: graph.primary_name(entity.id),
                    property: missing.to_string(),
                });
            }
            for name in registry.recommended(type_id) {
                if !present(name) {
                    self.diagnostics.report(
                        entity.identity.to_string(),
                        format!("recommended property '{}' is not set", name),
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Identity and type entries.
    fn header(&self, entity: &Entity) -> Entries {
        let (id_key, type_key) = match self.config.naming {
            Naming::Short => (keys::ID_KEY, keys::TYPE_KEY),
            Naming::Full => (keys::FULL_ID_KEY, keys::FULL_TYPE_KEY),
        };
        vec![
            (
                id_key.to_string(),
                JsonValue::String(entity.identity.to_string()),
            ),
            (type_key.to_string(), self.type_value(entity)),
        ]
    }

    fn stub(&self, id: EntityId) -> ModelResult<Entries> {
        let entity = self.graph.get(id).ok_or(ModelError::EntityNotFound(id))?;
        let mut entries = self.header(entity);
        if let Some(label) = entity.label() {
            entries.push((
                self.property_key(entity, keys::LABEL),
                JsonValue::String(label.to_string()),
            ));
        }
        Ok(entries)
    }

    fn type_value(&self, entity: &Entity) -> JsonValue {
        let registry = self.graph.registry();
        let mut names: Vec<JsonValue> = entity
            .types
            .iter()
            .filter_map(|t| registry.rendered_type(*t))
            .map(|node| {
                let name = match self.config.naming {
                    Naming::Short => node.name.clone(),
                    Naming::Full => self
                        .context
                        .and_then(|c| c.term(&node.name))
                        .map(|term| term.id.clone())
                        .unwrap_or_else(|| node.class_id.clone()),
                };
                JsonValue::String(name)
            })
            .collect();
        if names.len() == 1 {
            names.remove(0)
        } else {
            JsonValue::Array(names)
        }
    }

    fn property_key(&self, entity: &Entity, name: &str) -> String {
        match self.config.naming {
            Naming::Short => name.to_string(),
            Naming::Full => self
                .context
                .and_then(|c| c.term(name))
                .map(|term| term.id.clone())
                .or_else(|| {
                    self.graph
                        .registry()
                        .find_property_in(&entity.types, name)
                        .map(|p| p.id.clone())
                })
                .unwrap_or_else(|| name.to_string()),
        }
    }

    /// Sort into canonical key order and build the object.
    fn finish(&self, mut entries: Entries) -> JsonValue {
        self.graph
            .registry()
            .key_order()
            .sort(&mut entries, self.config.naming);
        JsonValue::Object(entries.into_iter().collect::<Map<String, JsonValue>>())
    }
}
