//! Class and property descriptors: the schema-time view of the ontology.

use crate::{CompileError, CompileResult};
use ontic_core::DEFAULT_KEY_ORDER;

/// Profile usage flag for a class or property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Usage {
    /// Not instantiable under the profile.
    Disallowed,
    #[default]
    Allowed,
    /// Usable, but every use emits a diagnostic.
    Warn,
}

impl Usage {
    /// Parse a usage cell (`0`/`1`/`2` or the words). Empty means allowed.
    pub fn parse(cell: &str) -> CompileResult<Self> {
        match cell.trim().to_ascii_lowercase().as_str() {
            "" | "1" | "allowed" => Ok(Usage::Allowed),
            "0" | "disallowed" => Ok(Usage::Disallowed),
            "2" | "warn" => Ok(Usage::Warn),
            _ => Err(CompileError::invalid_flag("usage", cell)),
        }
    }
}

/// An ontology class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    /// Ontology id, e.g. `crm:E21_Person`.
    pub id: String,
    /// Short name, e.g. `Person`.
    pub name: String,
    pub label: String,
    pub description: String,
    /// Parent class ids in declaration order.
    pub parents: Vec<String>,
    pub usage: Usage,
    /// Properties whose domain is this class.
    pub properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: String::new(),
            description: String::new(),
            parents: Vec::new(),
            usage: Usage::Allowed,
            properties: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// Find a declared property by short name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// An ontology property, filed under its domain class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Ontology id, e.g. `crm:P1_is_identified_by`.
    pub id: String,
    /// Short name, e.g. `identified_by`.
    pub name: String,
    pub label: String,
    pub description: String,
    pub super_property: Option<String>,
    /// Declared domain class id.
    pub domain: String,
    /// Declared range: a class id, or anything else for a literal.
    pub range: String,
    /// Ontology id of the inverse property.
    pub inverse: Option<String>,
    /// List-valued when true.
    pub multiple: bool,
    pub usage: Usage,
    /// Display-order hint.
    pub order: u32,
}

impl PropertyDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        domain: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: String::new(),
            description: String::new(),
            super_property: None,
            domain: domain.into(),
            range: range.into(),
            inverse: None,
            multiple: true,
            usage: Usage::Allowed,
            order: DEFAULT_KEY_ORDER,
        }
    }

    /// Make the property single-valued.
    pub fn single(mut self) -> Self {
        self.multiple = false;
        self
    }

    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
