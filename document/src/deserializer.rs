//! Nested document to entity graph.
//!
//! Fields are read in canonical key order so identity-bearing fields tend to
//! be seen before fields that point at them. A bare identifier that is not
//! yet known becomes a minimal stub when the range is generic, and a forward
//! reference otherwise; forward references are resolved once the whole
//! document has been read.

use crate::literal::json_to_literal;
use ontic_compiler::ContextDocument;
use ontic_core::{
    keys, Diagnostics, EntityId, Identity, ModelError, ModelResult, Naming, TypeId, Value,
};
use ontic_graph::Graph;
use ontic_registry::Range;
use serde_json::{Map, Value as JsonValue};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// A reference to an identity not yet seen: (owner, property, target).
type ForwardReference = (EntityId, String, Identity);

/// Per-call deserialization state.
pub struct Deserializer<'a> {
    graph: &'a mut Graph,
    context: Option<&'a ContextDocument>,
    diagnostics: &'a mut Diagnostics,
    /// Identities met in this document.
    seen: HashMap<Identity, EntityId>,
    /// Entities known only from a stub so far.
    provisional: HashSet<EntityId>,
    /// Stubs created for unseen generic references.
    generic_stubs: Vec<EntityId>,
    forward: Vec<ForwardReference>,
}

impl<'a> Deserializer<'a> {
    pub fn new(graph: &'a mut Graph, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            graph,
            context: None,
            diagnostics,
            seen: HashMap::new(),
            provisional: HashSet::new(),
            generic_stubs: Vec::new(),
            forward: Vec::new(),
        }
    }

    /// Use a context to map full ids back to short names.
    pub fn with_context(mut self, context: Option<&'a ContextDocument>) -> Self {
        self.context = context;
        self
    }

    /// Read a document and return its root entity. On error the graph is
    /// left exactly as it was before the call.
    pub fn read(mut self, document: &JsonValue) -> ModelResult<EntityId> {
        let checkpoint = self.graph.checkpoint();
        match self.document(document) {
            Ok(root) => {
                self.graph.release(checkpoint);
                Ok(root)
            }
            Err(err) => {
                debug!(error = %err, "read failed, discarding partial graph");
                self.graph.rollback(checkpoint);
                Err(err)
            }
        }
    }

    fn document(&mut self, document: &JsonValue) -> ModelResult<EntityId> {
        let map = match document {
            JsonValue::Object(map) if !map.is_empty() => map,
            JsonValue::Object(_) => return Err(ModelError::malformed("empty document")),
            other => {
                return Err(ModelError::malformed(format!(
                    "expected an object at the root, found {}",
                    json_kind(other)
                )))
            }
        };
        let root = self.node(map)?;
        self.resolve_forward()?;

        for stub in std::mem::take(&mut self.generic_stubs) {
            if self.provisional.contains(&stub) {
                let identity = self.identity_string(stub);
                self.diagnostics
                    .report(identity, "referenced but not described; kept as a stub")?;
            }
        }
        Ok(root)
    }

    fn node(&mut self, map: &Map<String, JsonValue>) -> ModelResult<EntityId> {
        if map.is_empty() {
            return Err(ModelError::malformed("empty object"));
        }
        let identity = match map.get(keys::ID_KEY).or_else(|| map.get(keys::FULL_ID_KEY)) {
            Some(JsonValue::String(raw)) => Some(Identity::parse(raw)),
            Some(other) => {
                return Err(ModelError::malformed(format!(
                    "identifier must be a string, found {}",
                    json_kind(other)
                )))
            }
            None => None,
        };
        let types = self.types(map.get(keys::TYPE_KEY).or_else(|| map.get(keys::FULL_TYPE_KEY)))?;
        let labelled = map.keys().any(|k| self.is_label(&types, k));
        let described = map
            .keys()
            .any(|k| !keys::is_structural(k) && !self.is_label(&types, k));

        let id = match identity.as_ref().and_then(|i| self.seen.get(i)).copied() {
            Some(existing) if self.provisional.contains(&existing) && described => {
                // The full occurrence of something first met as a stub
                self.provisional.remove(&existing);
                self.graph.retype(existing, types.clone())?;
                if labelled && self.graph.attr(existing, keys::LABEL).is_some() {
                    self.graph.unset(existing, keys::LABEL)?;
                }
                existing
            }
            Some(existing) => return Ok(existing),
            None => {
                let created = self.graph.create_typed(types.clone(), identity.clone())?;
                if let Some(identity) = identity {
                    self.seen.insert(identity, created);
                    if !described {
                        self.provisional.insert(created);
                    }
                }
                created
            }
        };

        self.fields(id, &types, map)?;
        Ok(id)
    }

    fn fields(
        &mut self,
        id: EntityId,
        types: &[TypeId],
        map: &Map<String, JsonValue>,
    ) -> ModelResult<()> {
        let validate = self.graph.config().validate_properties;
        let mut fields = Vec::new();
        for (key, value) in map {
            if keys::is_structural(key) {
                continue;
            }
            let name = match self.short_name(types, key) {
                Some(name) => name,
                None if validate => {
                    return Err(ModelError::unknown_property(self.graph.primary_name(id), key))
                }
                None => key.clone(),
            };
            fields.push((name, value));
        }
        self.graph
            .registry()
            .key_order()
            .sort(&mut fields, Naming::Short);

        for (name, json) in fields {
            let values = match json {
                JsonValue::Array(items) => {
                    let mut values = Vec::new();
                    for item in items {
                        if item.is_array() {
                            return Err(ModelError::malformed(format!(
                                "nested list in '{}'",
                                name
                            )));
                        }
                        values.extend(self.item(id, types, &name, item)?);
                    }
                    Value::List(values)
                }
                single => match self.item(id, types, &name, single)? {
                    Some(value) => value,
                    None => continue,
                },
            };
            let values = self.unheld(id, &name, values);
            if !values.is_empty() {
                self.graph.set(id, &name, values)?;
            }
        }
        Ok(())
    }

    /// Convert one JSON item. `None` means nothing to assign now.
    fn item(
        &mut self,
        owner: EntityId,
        types: &[TypeId],
        name: &str,
        json: &JsonValue,
    ) -> ModelResult<Option<Value>> {
        match json {
            JsonValue::Object(map) => Ok(Some(Value::Entity(self.node(map)?))),
            JsonValue::String(raw) => match self.reference_range(types, name) {
                Some(generic) => self.reference(owner, name, Identity::parse(raw), generic),
                None => Ok(Some(Value::String(raw.clone()))),
            },
            JsonValue::Null => Ok(None),
            literal => json_to_literal(literal).map(Some),
        }
    }

    /// `Some(generic)` when string values of `name` are references; `generic`
    /// tells whether the range accepts any entity.
    fn reference_range(&self, types: &[TypeId], name: &str) -> Option<bool> {
        let registry = self.graph.registry();
        match registry.find_property_in(types, name) {
            Some(property) => match property.range {
                Range::Literal => None,
                Range::Type(range) => Some(range == registry.root()),
            },
            None => self
                .context
                .filter(|c| c.is_reference(name))
                .map(|_| true),
        }
    }

    fn reference(
        &mut self,
        owner: EntityId,
        name: &str,
        identity: Identity,
        generic: bool,
    ) -> ModelResult<Option<Value>> {
        if let Some(&known) = self.seen.get(&identity) {
            return Ok(Some(Value::Entity(known)));
        }
        if generic {
            let root = self.graph.registry().root();
            let stub = self.graph.create_typed(vec![root], Some(identity.clone()))?;
            self.seen.insert(identity, stub);
            self.provisional.insert(stub);
            self.generic_stubs.push(stub);
            return Ok(Some(Value::Entity(stub)));
        }
        debug!(target = %identity, property = name, "deferring forward reference");
        self.forward.push((owner, name.to_string(), identity));
        Ok(None)
    }

    fn resolve_forward(&mut self) -> ModelResult<()> {
        for (owner, name, identity) in std::mem::take(&mut self.forward) {
            match self.seen.get(&identity).copied() {
                Some(target) => {
                    let value = self.unheld(owner, &name, Value::Entity(target));
                    if !value.is_empty() {
                        self.graph.set(owner, &name, value)?;
                    }
                }
                None => {
                    return Err(ModelError::UnresolvedReference {
                        owner: self.identity_string(owner),
                        property: name,
                        target: identity.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Resolve the type field: one name, or a list matched against the
    /// registered combinations. No type field means the generic root type.
    fn types(&self, field: Option<&JsonValue>) -> ModelResult<Vec<TypeId>> {
        let registry = Arc::clone(self.graph.registry());
        let names: Vec<&str> = match field {
            None => return Ok(vec![registry.root()]),
            Some(JsonValue::String(name)) => vec![name.as_str()],
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|i| {
                    i.as_str()
                        .ok_or_else(|| ModelError::malformed("type entries must be strings"))
                })
                .collect::<ModelResult<_>>()?,
            Some(other) => {
                return Err(ModelError::malformed(format!(
                    "type must be a string or a list, found {}",
                    json_kind(other)
                )))
            }
        };

        let resolved = names
            .iter()
            .map(|n| self.lookup_type(n))
            .collect::<ModelResult<Vec<_>>>()?;
        match resolved.len() {
            0 => Err(ModelError::malformed("empty type list")),
            1 => Ok(resolved),
            _ => registry
                .combination_for(&resolved)
                .map(|c| c.types.clone())
                .ok_or_else(|| ModelError::AmbiguousType {
                    types: names.iter().map(|n| n.to_string()).collect(),
                }),
        }
    }

    fn lookup_type(&self, name: &str) -> ModelResult<TypeId> {
        let registry = self.graph.registry();
        registry
            .lookup_type(name)
            .or_else(|| {
                let context = self.context?;
                let compact = context.compact(name);
                registry
                    .lookup_type(&compact)
                    .or_else(|| context.term_for_id(name).and_then(|t| registry.lookup_type(t)))
            })
            .ok_or_else(|| ModelError::UnknownType(name.to_string()))
    }

    /// Drop references the owner already holds, e.g. through a materialized inverse.
    fn unheld(&self, owner: EntityId, name: &str, value: Value) -> Value {
        let held = match self.graph.attr(owner, name) {
            Some(current) => current.entities(),
            None => return value,
        };
        match value {
            Value::Entity(target) if held.contains(&target) => Value::Null,
            Value::List(items) => Value::List(
                items
                    .into_iter()
                    .filter(|item| !matches!(item, Value::Entity(t) if held.contains(t)))
                    .collect(),
            ),
            other => other,
        }
    }

    fn is_label(&self, types: &[TypeId], key: &str) -> bool {
        key == keys::LABEL || self.short_name(types, key).as_deref() == Some(keys::LABEL)
    }

    /// Map a document key (short name, schema id or context id) to a short name.
    fn short_name(&self, types: &[TypeId], key: &str) -> Option<String> {
        let registry = self.graph.registry();
        if registry.find_property_in(types, key).is_some() {
            return Some(key.to_string());
        }
        if let Some(property) = registry.find_property_by_id(types, key) {
            return Some(property.name.clone());
        }
        let context = self.context?;
        let term = context.term_for_id(key)?;
        if registry.find_property_in(types, term).is_some()
            || !self.graph.config().validate_properties
        {
            Some(term.to_string())
        } else {
            None
        }
    }

    fn identity_string(&self, id: EntityId) -> String {
        self.graph
            .identity(id)
            .map(|i| i.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}
