//! The compiled schema: class descriptors with their properties nested
//! under them, plus the key-order table assembled from property hints.

use crate::{ClassDescriptor, CompileError, CompileResult, PropertyDescriptor};
use indexmap::IndexMap;
use ontic_core::{keys, KeyOrder};
use tracing::debug;

/// Class and property descriptors, keyed by class id in declaration order.
#[derive(Debug, Clone)]
pub struct Schema {
    classes: IndexMap<String, ClassDescriptor>,
    key_order: KeyOrder,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Create a schema holding only the synthetic root class.
    pub fn new() -> Self {
        let mut root = ClassDescriptor::new(keys::ROOT_CLASS_ID, keys::ROOT_CLASS_NAME)
            .with_label("Resource");
        root.properties.push(
            PropertyDescriptor::new(keys::LABEL_ID, keys::LABEL, keys::ROOT_CLASS_ID, "")
                .with_label("label")
                .single(),
        );
        root.properties.push(
            PropertyDescriptor::new(
                keys::DESCRIPTION_ID,
                keys::DESCRIPTION,
                keys::ROOT_CLASS_ID,
                "",
            )
            .with_label("description")
            .single(),
        );

        let mut classes = IndexMap::new();
        classes.insert(root.id.clone(), root);
        Self {
            classes,
            key_order: KeyOrder::new(),
        }
    }

    /// Add a class. Its `properties` are added through [`Schema::add_property`].
    pub fn add_class(&mut self, mut class: ClassDescriptor) -> CompileResult<()> {
        if self.classes.contains_key(&class.id) {
            return Err(CompileError::DuplicateClass(class.id));
        }
        let properties = std::mem::take(&mut class.properties);
        self.classes.insert(class.id.clone(), class);
        for property in properties {
            self.add_property(property)?;
        }
        Ok(())
    }

    /// File a property under its domain class. An undeclared domain files it
    /// under the synthetic root instead.
    pub fn add_property(&mut self, property: PropertyDescriptor) -> CompileResult<()> {
        let domain = if self.classes.contains_key(&property.domain) {
            property.domain.clone()
        } else {
            debug!(
                property = %property.name,
                domain = %property.domain,
                "undeclared domain, filing property under the root class"
            );
            keys::ROOT_CLASS_ID.to_string()
        };

        let class = self
            .classes
            .get_mut(&domain)
            .ok_or_else(|| CompileError::malformed(format!("missing class '{}'", domain)))?;
        if class.property(&property.name).is_some() {
            return Err(CompileError::DuplicateProperty {
                class: class.id.clone(),
                name: property.name,
            });
        }

        self.key_order
            .merge_hint(&property.name, &property.id, property.order);
        class.properties.push(property);
        Ok(())
    }

    pub fn class(&self, id: &str) -> Option<&ClassDescriptor> {
        self.classes.get(id)
    }

    /// All classes, the synthetic root first.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.len() <= 1
    }

    pub fn root(&self) -> &ClassDescriptor {
        &self.classes[0]
    }

    pub fn key_order(&self) -> &KeyOrder {
        &self.key_order
    }

    /// Declared parents of a class that exist in the schema; the synthetic
    /// root when none do.
    pub fn effective_parents(&self, class: &ClassDescriptor) -> Vec<String> {
        if class.id == keys::ROOT_CLASS_ID {
            return Vec::new();
        }
        let known: Vec<String> = class
            .parents
            .iter()
            .filter(|p| self.classes.contains_key(p.as_str()))
            .cloned()
            .collect();
        if known.is_empty() {
            vec![keys::ROOT_CLASS_ID.to_string()]
        } else {
            known
        }
    }

    /// Classes that name `id` among their effective parents.
    pub fn subclasses(&self, id: &str) -> Vec<&ClassDescriptor> {
        self.classes
            .values()
            .filter(|c| self.effective_parents(c).iter().any(|p| p == id))
            .collect()
    }
}
