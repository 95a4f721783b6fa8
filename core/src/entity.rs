//! The entity structure.
//!
//! An entity is one typed resource in an object graph. It is typed by one
//! or more type nodes (several for multi-type combinations) and holds
//! validated attributes plus unvalidated internal ones.

use crate::{keys, Attributes, EntityId, Identity, TypeId, Value};

/// A typed resource in an object graph.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Handle inside the owning graph.
    pub id: EntityId,
    /// Public identity written to documents.
    pub identity: Identity,
    /// Type nodes, primary type first.
    pub types: Vec<TypeId>,
    /// Validated attribute values.
    pub attributes: Attributes,
    /// Internal attributes (names starting with `_`), never serialized.
    pub internal: Attributes,
}

impl Entity {
    pub fn new(id: EntityId, identity: Identity, types: Vec<TypeId>) -> Self {
        Self {
            id,
            identity,
            types,
            attributes: Attributes::new(),
            internal: Attributes::new(),
        }
    }

    /// The first (primary) type.
    pub fn primary_type(&self) -> Option<TypeId> {
        self.types.first().copied()
    }

    /// Get an attribute value by name, internal names included.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        if keys::is_internal(name) {
            self.internal.get(name)
        } else {
            self.attributes.get(name)
        }
    }

    /// Store a value without validation.
    pub fn set_attr(&mut self, name: String, value: Value) {
        if keys::is_internal(&name) {
            self.internal.insert(name, value);
        } else {
            self.attributes.insert(name, value);
        }
    }

    /// Remove an attribute, keeping the order of the others.
    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        if keys::is_internal(name) {
            self.internal.shift_remove(name)
        } else {
            self.attributes.shift_remove(name)
        }
    }

    /// The label, if one is set as a plain string.
    pub fn label(&self) -> Option<&str> {
        self.attributes.get(keys::LABEL).and_then(Value::as_str)
    }
}
