//! HierarchyBuilder: realizes a compiled schema as a type-node graph.

use crate::{PropertyDef, Range, Registry, TypeNode};
use ontic_compiler::{ClassDescriptor, CompileError, PropertyDescriptor, Schema};
use ontic_core::{keys, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during registry construction or extension.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Unknown property '{property}' on type '{type_name}'")]
    UnknownProperty { type_name: String, property: String },

    #[error("Inheritance cycle detected involving type: {0}")]
    InheritanceCycle(String),

    #[error("Invalid combination '{name}': {reason}")]
    InvalidCombination { name: String, reason: String },

    #[error("Duplicate named instance: {0}")]
    DuplicateInstance(String),

    #[error("Schema error: {0}")]
    Compile(#[from] CompileError),
}

/// Depth-first builder of the type-node graph.
///
/// Each class becomes exactly one node. A class reached again through a
/// second parent only gains that parent link; its subtree is not revisited.
#[derive(Debug)]
pub struct HierarchyBuilder<'s> {
    schema: &'s Schema,
    nodes: Vec<TypeNode>,
    by_class: HashMap<String, TypeId>,
    /// Class id to the ids of classes listing it as an effective parent.
    children: HashMap<String, Vec<String>>,
    /// Property ranges awaiting resolution: (type, property name, range id).
    pending: Vec<(TypeId, String, String)>,
    /// Classes on the current depth-first path.
    path: Vec<String>,
}

impl<'s> HierarchyBuilder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for class in schema.classes() {
            for parent in schema.effective_parents(class) {
                children.entry(parent).or_default().push(class.id.clone());
            }
        }
        Self {
            schema,
            nodes: Vec::new(),
            by_class: HashMap::new(),
            children,
            pending: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Build the registry.
    pub fn build(mut self) -> Result<Registry, RegistryError> {
        let root_id = self.schema.root().id.clone();
        self.visit(&root_id, None)?;

        // Classes never reached hang off a parent cycle
        if let Some(stranded) = self
            .schema
            .classes()
            .find(|c| !self.by_class.contains_key(&c.id))
        {
            return Err(RegistryError::InheritanceCycle(stranded.id.clone()));
        }

        self.resolve_ranges();
        self.link_ancestors();

        let root = self.by_class[&root_id];
        let mut registry = Registry::new(self.nodes, root, self.schema.key_order().clone())?;
        registry.resolve_inverses();
        debug!(types = registry.type_count(), "built type hierarchy");
        Ok(registry)
    }

    fn visit(&mut self, class_id: &str, parent: Option<TypeId>) -> Result<(), RegistryError> {
        if self.path.iter().any(|c| c == class_id) {
            return Err(RegistryError::InheritanceCycle(class_id.to_string()));
        }

        if let Some(&existing) = self.by_class.get(class_id) {
            // Reached through another parent branch: merge the linkage only
            if let Some(parent) = parent {
                let node = &mut self.nodes[existing.raw() as usize];
                if !node.parents.contains(&parent) {
                    node.parents.push(parent);
                }
            }
            return Ok(());
        }

        let class = self
            .schema
            .class(class_id)
            .ok_or_else(|| RegistryError::UnknownType(class_id.to_string()))?;
        let id = self.add_node(class, parent);

        self.path.push(class_id.to_string());
        let children = self.children.get(class_id).cloned().unwrap_or_default();
        for child in children {
            self.visit(&child, Some(id))?;
        }
        self.path.pop();
        Ok(())
    }

    fn add_node(&mut self, class: &ClassDescriptor, parent: Option<TypeId>) -> TypeId {
        let id = TypeId::new(self.nodes.len() as u32);
        let mut node = TypeNode::new(id, &class.id, &class.name);
        node.label = class.label.clone();
        node.description = class.description.clone();
        node.usage = class.usage;
        node.parents.extend(parent);

        // Ranges are provisional until every class has a node
        for property in &class.properties {
            self.pending
                .push((id, property.name.clone(), property.range.clone()));
            node.properties
                .insert(property.name.clone(), property_def(property, id, Range::Literal));
        }

        self.by_class.insert(class.id.clone(), id);
        self.nodes.push(node);
        id
    }

    fn resolve_ranges(&mut self) {
        for (type_id, name, range_id) in std::mem::take(&mut self.pending) {
            let range = match self.by_class.get(&range_id) {
                Some(&target) => Range::Type(target),
                None => Range::Literal,
            };
            if let Some(property) = self.nodes[type_id.raw() as usize].properties.get_mut(&name) {
                property.range = range;
            }
        }
    }

    fn link_ancestors(&mut self) {
        // Parent links follow declaration order, not discovery order
        for node in &mut self.nodes {
            if let Some(class) = self.schema.class(&node.class_id) {
                let declared = self.schema.effective_parents(class);
                let position = |id: &TypeId| {
                    declared
                        .iter()
                        .position(|p| self.by_class.get(p) == Some(id))
                        .unwrap_or(usize::MAX)
                };
                node.parents.sort_by_key(position);
            }
        }

        let root = self.by_class.get(keys::ROOT_CLASS_ID).copied();
        let ancestors: Vec<Vec<TypeId>> = self
            .nodes
            .iter()
            .map(|node| ancestors_of(&self.nodes, node.id, root))
            .collect();
        for (node, list) in self.nodes.iter_mut().zip(ancestors) {
            node.ancestors = list;
        }
    }
}

/// Breadth-first ancestor list: self first, closest first, root last.
pub(crate) fn ancestors_of(nodes: &[TypeNode], start: TypeId, root: Option<TypeId>) -> Vec<TypeId> {
    let mut list = vec![start];
    let mut seen: HashSet<TypeId> = HashSet::from([start]);
    let mut queue: VecDeque<TypeId> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for &parent in &nodes[current.raw() as usize].parents {
            if seen.insert(parent) {
                queue.push_back(parent);
                if Some(parent) != root {
                    list.push(parent);
                }
            }
        }
    }

    if let Some(root) = root {
        if start != root {
            list.push(root);
        }
    }
    list
}

/// Runtime definition of a descriptor declared on `domain`.
pub(crate) fn property_def(descriptor: &PropertyDescriptor, domain: TypeId, range: Range) -> PropertyDef {
    PropertyDef {
        id: descriptor.id.clone(),
        name: descriptor.name.clone(),
        label: descriptor.label.clone(),
        domain,
        range,
        inverse_id: descriptor.inverse.clone(),
        inverse: None,
        multiple: descriptor.multiple,
        usage: descriptor.usage,
        order: descriptor.order,
    }
}
