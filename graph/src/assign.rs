//! Validated attribute assignment.
//!
//! `Graph::set` is the single entry point for changing an entity's
//! attributes. In order:
//! 1. internal names (`_x`) are stored as-is; `id` replaces the identity;
//!    `type` and `@context` are reserved; `Null` removes the attribute
//! 2. the property is looked up through the ancestor chain
//! 3. the profile may forbid it or ask for a diagnostic
//! 4. every item is checked against the range
//! 5. multiplicity decides between storing, appending, promoting or rejecting
//! 6. inverses are materialized on the targets when configured; a failure
//!    there restores the forward slot and every target already written

use crate::{Graph, Multiplicity};
use ontic_core::{keys, EntityId, ModelError, ModelResult, Value};
use ontic_registry::{PropertyDef, Range, Usage};
use std::sync::Arc;

impl Graph {
    /// Assign a value to a named attribute, validating it against the registry.
    pub fn set(&mut self, id: EntityId, name: &str, value: impl Into<Value>) -> ModelResult<()> {
        self.assign(id, name, value.into(), false)
    }

    /// Remove an attribute.
    pub fn unset(&mut self, id: EntityId, name: &str) -> ModelResult<()> {
        self.assign(id, name, Value::Null, false)
    }

    fn assign(
        &mut self,
        id: EntityId,
        name: &str,
        value: Value,
        inverted: bool,
    ) -> ModelResult<()> {
        let types = self.entity_ref(id)?.types.clone();

        if keys::is_internal(name) {
            self.entity_mut(id)?.set_attr(name.to_string(), value);
            return Ok(());
        }
        match name {
            keys::ID_KEY | keys::FULL_ID_KEY => {
                let ident = value.as_str().ok_or_else(|| {
                    ModelError::type_mismatch(name, "String", value.type_name())
                })?;
                return self.set_identity(id, ident);
            }
            keys::CONTEXT_KEY | keys::TYPE_KEY | keys::FULL_TYPE_KEY => {
                return Err(ModelError::ReservedName(name.to_string()));
            }
            _ => {}
        }
        if value.is_null() {
            self.entity_mut(id)?.remove_attr(name);
            return Ok(());
        }
        if !self.config().validate_properties {
            return self.store_unchecked(id, name, value);
        }

        let registry = Arc::clone(self.registry());
        let property = registry
            .find_property_in(&types, name)
            .ok_or_else(|| ModelError::unknown_property(self.primary_name(id), name))?;

        match property.usage {
            Usage::Allowed => {}
            Usage::Disallowed => {
                return Err(ModelError::profile_violation(format!("property '{}'", name)));
            }
            Usage::Warn => {
                let subject = format!("{}.{}", self.primary_name(id), name);
                self.diagnostics_mut()
                    .report(subject, "property is discouraged by the profile")?;
            }
        }

        for item in value.items() {
            self.check_range(property, item)?;
        }
        let previous = self.slot(id, &property.name)?;
        self.store(id, property, &value)?;

        if inverted || !self.config().materialize_inverses {
            return Ok(());
        }
        if let Some(inverse) = &property.inverse {
            if let Err(err) = self.materialize(id, inverse, &value) {
                self.restore(id, &property.name, previous);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Write `inverse` back onto every target of `value`. Either every
    /// target is updated or none is.
    fn materialize(&mut self, id: EntityId, inverse: &str, value: &Value) -> ModelResult<()> {
        let registry = Arc::clone(self.registry());
        let mut written: Vec<(EntityId, Option<Value>)> = Vec::new();

        for target in value.entities() {
            // Out-of-model targets (generic root type) carry no inverse slot
            let types = &self.entity_ref(target)?.types;
            if registry.find_property_in(types, inverse).is_none()
                || self.holds(target, inverse, id)
            {
                continue;
            }
            let previous = self.slot(target, inverse)?;
            if let Err(err) = self.assign(target, inverse, Value::Entity(id), true) {
                self.restore(target, inverse, previous);
                for (done, before) in written.into_iter().rev() {
                    self.restore(done, inverse, before);
                }
                return Err(err);
            }
            written.push((target, previous));
        }
        Ok(())
    }

    fn slot(&self, id: EntityId, name: &str) -> ModelResult<Option<Value>> {
        Ok(self.entity_ref(id)?.attributes.get(name).cloned())
    }

    fn restore(&mut self, id: EntityId, name: &str, previous: Option<Value>) {
        if let Ok(entity) = self.entity_mut(id) {
            match previous {
                Some(value) => {
                    entity.attributes.insert(name.to_string(), value);
                }
                None => {
                    entity.attributes.shift_remove(name);
                }
            }
        }
    }

    fn check_range(&self, property: &PropertyDef, item: &Value) -> ModelResult<()> {
        match (property.range, item) {
            (_, Value::List(_)) => Err(ModelError::type_mismatch(
                &property.name,
                "a single value per item",
                "nested List",
            )),
            (Range::Literal, Value::Entity(target)) => Err(ModelError::type_mismatch(
                &property.name,
                "a literal",
                self.primary_name(*target),
            )),
            (Range::Literal, _) => Ok(()),
            (Range::Type(expected), Value::Entity(target)) => {
                let registry = self.registry();
                let entity = self.entity_ref(*target)?;
                // The generic root type stands in for out-of-model references
                let accepted = entity
                    .types
                    .iter()
                    .any(|t| *t == registry.root() || registry.is_subtype(*t, expected));
                if accepted {
                    Ok(())
                } else {
                    Err(ModelError::type_mismatch(
                        &property.name,
                        type_name(self, expected),
                        self.primary_name(*target),
                    ))
                }
            }
            (Range::Type(expected), literal) => Err(ModelError::type_mismatch(
                &property.name,
                type_name(self, expected),
                literal.type_name(),
            )),
        }
    }

    fn store(&mut self, id: EntityId, property: &PropertyDef, value: &Value) -> ModelResult<()> {
        let multiplicity = self.config().multiplicity;
        let type_name = self.primary_name(id);
        let entity = self.entity_mut(id)?;
        let items = value.items().to_vec();

        if property.multiple {
            match entity.attributes.get_mut(&property.name) {
                Some(Value::List(existing)) => existing.extend(items),
                Some(single) => {
                    let previous = std::mem::replace(single, Value::Null);
                    let mut list = vec![previous];
                    list.extend(items);
                    *single = Value::List(list);
                }
                None => {
                    entity
                        .attributes
                        .insert(property.name.clone(), Value::List(items));
                }
            }
            return Ok(());
        }

        let current = entity.attributes.get(&property.name);
        match (current, items.len()) {
            (_, 0) => Ok(()),
            (None, 1) => {
                entity
                    .attributes
                    .insert(property.name.clone(), items[0].clone());
                Ok(())
            }
            _ => match multiplicity {
                Multiplicity::Strict => Err(ModelError::TooManyValues {
                    type_name,
                    property: property.name.clone(),
                }),
                Multiplicity::Promote => {
                    let mut list = current.map(|v| v.items().to_vec()).unwrap_or_default();
                    list.extend(items);
                    entity
                        .attributes
                        .insert(property.name.clone(), Value::List(list));
                    Ok(())
                }
            },
        }
    }

    /// Store without a property definition: a second value turns the slot into a list.
    fn store_unchecked(&mut self, id: EntityId, name: &str, value: Value) -> ModelResult<()> {
        let entity = self.entity_mut(id)?;
        match entity.attributes.get_mut(name) {
            Some(existing) => {
                let mut list = existing.items().to_vec();
                list.extend(value.items().iter().cloned());
                *existing = Value::List(list);
            }
            None => {
                entity.attributes.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// True when `owner.name` already references `target`.
    fn holds(&self, owner: EntityId, name: &str, target: EntityId) -> bool {
        self.attr(owner, name)
            .map(|v| v.entities().contains(&target))
            .unwrap_or(false)
    }
}

fn type_name(graph: &Graph, id: ontic_core::TypeId) -> String {
    graph
        .registry()
        .get_type(id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| id.to_string())
}
