//! The Registry: type lookups, property resolution, profiles and extension.
//!
//! Lookups take `&self`. Everything that changes the type system
//! (`extend`, combinations, vocabulary classes, required lists) takes
//! `&mut self`, so it can only run before the registry is shared.

use crate::builder::{ancestors_of, property_def};
use crate::{
    Classification, Combination, HierarchyBuilder, NamedInstance, PropertyDef, Range,
    RegistryError, TypeNode, VocabularyClass,
};
use indexmap::{IndexMap, IndexSet};
use ontic_compiler::{Compiler, PropertyDescriptor, Schema};
use ontic_core::{KeyOrder, TypeId};
use std::collections::HashMap;
use std::path::Path;

/// The runtime type system.
#[derive(Debug)]
pub struct Registry {
    /// Type nodes indexed by TypeId.
    types: Vec<TypeNode>,
    /// Short name to type.
    type_names: HashMap<String, TypeId>,
    /// Ontology class id to type.
    class_ids: HashMap<String, TypeId>,
    combinations: Vec<Combination>,
    /// Shared entities by name, in registration order.
    instances: IndexMap<String, NamedInstance>,
    key_order: KeyOrder,
    root: TypeId,
}

impl Registry {
    pub(crate) fn new(
        types: Vec<TypeNode>,
        root: TypeId,
        key_order: KeyOrder,
    ) -> Result<Self, RegistryError> {
        let mut type_names = HashMap::new();
        let mut class_ids = HashMap::new();
        for node in &types {
            if type_names.insert(node.name.clone(), node.id).is_some() {
                return Err(RegistryError::DuplicateTypeName(node.name.clone()));
            }
            class_ids.insert(node.class_id.clone(), node.id);
        }
        Ok(Self {
            types,
            type_names,
            class_ids,
            combinations: Vec::new(),
            instances: IndexMap::new(),
            key_order,
            root,
        })
    }

    /// Build a registry from a compiled schema.
    pub fn from_schema(schema: &Schema) -> Result<Self, RegistryError> {
        HierarchyBuilder::new(schema).build()
    }

    /// Compile a schema file and build a registry from it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let schema = Compiler::new()?.compile_file(path)?;
        Self::from_schema(&schema)
    }

    // ==================== Type Lookups ====================

    pub fn get_type(&self, id: TypeId) -> Option<&TypeNode> {
        self.types.get(id.raw() as usize)
    }

    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeNode> {
        self.type_names.get(name).and_then(|id| self.get_type(*id))
    }

    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    pub fn get_type_by_class_id(&self, class_id: &str) -> Option<&TypeNode> {
        self.class_ids.get(class_id).and_then(|id| self.get_type(*id))
    }

    /// Resolve a short name or an ontology class id.
    pub fn lookup_type(&self, name_or_id: &str) -> Option<TypeId> {
        self.type_names
            .get(name_or_id)
            .or_else(|| self.class_ids.get(name_or_id))
            .copied()
    }

    /// The synthetic root type.
    pub fn root(&self) -> TypeId {
        self.root
    }

    pub fn all_types(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.iter()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn key_order(&self) -> &KeyOrder {
        &self.key_order
    }

    // ==================== Hierarchy ====================

    /// Ancestor list of a type (self first, root last).
    pub fn ancestors(&self, id: TypeId) -> &[TypeId] {
        self.get_type(id).map(|t| t.ancestors.as_slice()).unwrap_or(&[])
    }

    /// Check if `sub` is `super_type` or one of its descendants.
    pub fn is_subtype(&self, sub: TypeId, super_type: TypeId) -> bool {
        self.ancestors(sub).contains(&super_type)
    }

    /// All strict descendants of a type.
    pub fn descendants(&self, id: TypeId) -> Vec<TypeId> {
        self.types
            .iter()
            .filter(|t| t.id != id && t.ancestors.contains(&id))
            .map(|t| t.id)
            .collect()
    }

    /// The type a document shows for `id`: vocabulary classes render as
    /// their nearest ontology ancestor.
    pub fn rendered_type(&self, id: TypeId) -> Option<&TypeNode> {
        self.ancestors(id)
            .iter()
            .filter_map(|a| self.get_type(*a))
            .find(|t| !t.is_vocabulary())
    }

    // ==================== Properties ====================

    /// Find a property by short name, nearest declaration first.
    pub fn find_property(&self, type_id: TypeId, name: &str) -> Option<&PropertyDef> {
        self.ancestors(type_id)
            .iter()
            .filter_map(|a| self.get_type(*a))
            .find_map(|t| t.property(name))
    }

    /// Find a property on any of several types (multi-typed entities).
    pub fn find_property_in(&self, types: &[TypeId], name: &str) -> Option<&PropertyDef> {
        types.iter().find_map(|t| self.find_property(*t, name))
    }

    /// Find a property by ontology id on any of several types.
    pub fn find_property_by_id(&self, types: &[TypeId], id: &str) -> Option<&PropertyDef> {
        types.iter().find_map(|t| {
            self.ancestors(*t)
                .iter()
                .filter_map(|a| self.get_type(*a))
                .find_map(|node| node.properties.values().find(|p| p.id == id))
        })
    }

    /// Merged property table: one definition per reachable name, the
    /// closest ancestor winning.
    pub fn properties(&self, type_id: TypeId) -> Vec<&PropertyDef> {
        let mut seen = IndexSet::new();
        let mut merged = Vec::new();
        for node in self.ancestors(type_id).iter().filter_map(|a| self.get_type(*a)) {
            for property in node.properties.values() {
                if seen.insert(property.name.as_str()) {
                    merged.push(property);
                }
            }
        }
        merged
    }

    // ==================== Profiles ====================

    /// Required attribute names, unioned over ancestors.
    pub fn required(&self, type_id: TypeId) -> Vec<&str> {
        self.collect_names(type_id, |t| &t.required)
    }

    /// Recommended attribute names, unioned over ancestors.
    pub fn recommended(&self, type_id: TypeId) -> Vec<&str> {
        self.collect_names(type_id, |t| &t.recommended)
    }

    fn collect_names<'a>(
        &'a self,
        type_id: TypeId,
        pick: impl Fn(&'a TypeNode) -> &'a Vec<String>,
    ) -> Vec<&'a str> {
        let mut names = IndexSet::new();
        for node in self.ancestors(type_id).iter().filter_map(|a| self.get_type(*a)) {
            names.extend(pick(node).iter().map(String::as_str));
        }
        names.into_iter().collect()
    }

    /// Mark properties as required for a type and its descendants.
    pub fn set_required(&mut self, type_name: &str, names: &[&str]) -> Result<(), RegistryError> {
        let id = self.checked_names(type_name, names)?;
        let node = &mut self.types[id.raw() as usize];
        node.required = names.iter().map(|n| n.to_string()).collect();
        Ok(())
    }

    /// Mark properties as recommended for a type and its descendants.
    pub fn set_recommended(
        &mut self,
        type_name: &str,
        names: &[&str],
    ) -> Result<(), RegistryError> {
        let id = self.checked_names(type_name, names)?;
        let node = &mut self.types[id.raw() as usize];
        node.recommended = names.iter().map(|n| n.to_string()).collect();
        Ok(())
    }

    fn checked_names(&self, type_name: &str, names: &[&str]) -> Result<TypeId, RegistryError> {
        let id = self
            .lookup_type(type_name)
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))?;
        if let Some(missing) = names.iter().find(|n| self.find_property(id, n).is_none()) {
            return Err(RegistryError::UnknownProperty {
                type_name: type_name.to_string(),
                property: missing.to_string(),
            });
        }
        Ok(id)
    }

    // ==================== Extension ====================

    /// Add or override a property on an existing type, resolving it the same
    /// way initial construction does.
    pub fn extend(
        &mut self,
        type_name: &str,
        descriptor: PropertyDescriptor,
    ) -> Result<(), RegistryError> {
        let id = self
            .lookup_type(type_name)
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))?;
        let range = match self.class_ids.get(&descriptor.range) {
            Some(&target) => Range::Type(target),
            None => Range::Literal,
        };
        self.key_order
            .merge_hint(&descriptor.name, &descriptor.id, descriptor.order);
        let property = property_def(&descriptor, id, range);
        self.types[id.raw() as usize]
            .properties
            .insert(property.name.clone(), property);
        self.resolve_inverses();
        Ok(())
    }

    /// Resolve every property's inverse id to the reciprocal property name on
    /// its range type. Properties without a match stay unidirectional.
    pub(crate) fn resolve_inverses(&mut self) {
        let mut resolved = Vec::new();
        for node in &self.types {
            for property in node.properties.values() {
                resolved.push((node.id, property.name.clone(), self.reciprocal(property)));
            }
        }
        for (type_id, name, inverse) in resolved {
            if let Some(property) = self.types[type_id.raw() as usize].properties.get_mut(&name) {
                property.inverse = inverse;
            }
        }
    }

    fn reciprocal(&self, property: &PropertyDef) -> Option<String> {
        let range = property.range_type()?;
        self.properties(range)
            .into_iter()
            .find(|candidate| {
                property.inverse_id.as_deref() == Some(candidate.id.as_str())
                    || candidate.inverse_id.as_deref() == Some(property.id.as_str())
            })
            .map(|candidate| candidate.name.clone())
    }

    // ==================== Combinations ====================

    /// Register a named combination of two or more types.
    pub fn register_combination(
        &mut self,
        name: &str,
        segment: &str,
        type_names: &[&str],
    ) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidCombination {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        if type_names.len() < 2 {
            return Err(invalid("needs at least two types"));
        }
        if self.type_names.contains_key(name) || self.combination(name).is_some() {
            return Err(RegistryError::DuplicateTypeName(name.to_string()));
        }
        let types = type_names
            .iter()
            .map(|t| {
                self.lookup_type(t)
                    .ok_or_else(|| RegistryError::UnknownType(t.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if self.combination_for(&types).is_some() {
            return Err(invalid("the same types are already combined"));
        }
        self.combinations.push(Combination {
            name: name.to_string(),
            segment: segment.to_string(),
            types,
        });
        Ok(())
    }

    pub fn combination(&self, name: &str) -> Option<&Combination> {
        self.combinations.iter().find(|c| c.name == name)
    }

    /// The combination whose types equal `types` as a set.
    pub fn combination_for(&self, types: &[TypeId]) -> Option<&Combination> {
        self.combinations.iter().find(|c| c.matches(types))
    }

    // ==================== Vocabulary ====================

    /// Register a vocabulary class: a specialization of an ontology class
    /// whose instances are classified with fixed terms.
    pub fn register_vocabulary(&mut self, class: VocabularyClass) -> Result<TypeId, RegistryError> {
        if self.type_names.contains_key(&class.name) || self.combination(&class.name).is_some() {
            return Err(RegistryError::DuplicateTypeName(class.name));
        }
        let parent = self
            .lookup_type(&class.parent)
            .ok_or_else(|| RegistryError::UnknownType(class.parent.clone()))?;
        let term_type = self
            .lookup_type(&class.term_type)
            .ok_or_else(|| RegistryError::UnknownType(class.term_type.clone()))?;
        if self.find_property(parent, &class.property).is_none() {
            return Err(RegistryError::UnknownProperty {
                type_name: class.parent,
                property: class.property,
            });
        }

        let id = TypeId::new(self.types.len() as u32);
        let base = &self.types[parent.raw() as usize];
        let mut node = TypeNode::new(id, base.class_id.clone(), class.name.clone());
        node.segment = base.segment.clone();
        node.label = class.name.clone();
        node.parents.push(parent);
        node.classification = Some(Classification {
            property: class.property,
            term_type,
            terms: class.terms,
        });
        self.types.push(node);
        self.types[id.raw() as usize].ancestors = ancestors_of(&self.types, id, Some(self.root));
        self.type_names.insert(class.name, id);
        Ok(id)
    }

    // ==================== Named Instances ====================

    /// Register a shared entity under a name. A graph creates it on first
    /// request and hands out the same entity afterwards.
    pub fn register_instance(
        &mut self,
        name: &str,
        type_name: &str,
        uri: &str,
        label: &str,
    ) -> Result<(), RegistryError> {
        if self.instances.contains_key(name) {
            return Err(RegistryError::DuplicateInstance(name.to_string()));
        }
        let type_id = self
            .lookup_type(type_name)
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))?;
        self.instances.insert(
            name.to_string(),
            NamedInstance {
                name: name.to_string(),
                type_id,
                uri: uri.to_string(),
                label: label.to_string(),
            },
        );
        Ok(())
    }

    pub fn instance(&self, name: &str) -> Option<&NamedInstance> {
        self.instances.get(name)
    }

    pub fn instances(&self) -> impl Iterator<Item = &NamedInstance> {
        self.instances.values()
    }
}
