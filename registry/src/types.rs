//! Runtime type definitions.

use indexmap::IndexMap;
use ontic_compiler::Usage;
use ontic_core::TypeId;

/// Resolved range of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    /// Any scalar literal.
    Literal,
    /// An entity of this type or a descendant.
    Type(TypeId),
}

/// A property as seen at runtime: range resolved, inverse resolved to a name.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    /// Ontology id.
    pub id: String,
    /// Short name.
    pub name: String,
    pub label: String,
    /// Type that declares the property.
    pub domain: TypeId,
    pub range: Range,
    /// Declared inverse ontology id.
    pub inverse_id: Option<String>,
    /// Short name of the reciprocal property on the range type, when one exists.
    pub inverse: Option<String>,
    pub multiple: bool,
    pub usage: Usage,
    pub order: u32,
}

impl PropertyDef {
    pub fn is_literal(&self) -> bool {
        self.range == Range::Literal
    }

    pub fn range_type(&self) -> Option<TypeId> {
        match self.range {
            Range::Type(id) => Some(id),
            Range::Literal => None,
        }
    }
}

/// A term assigned to every instance of a vocabulary class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyTerm {
    pub uri: String,
    pub label: String,
}

/// The classification a vocabulary class applies on creation.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Property used to attach the terms, e.g. `classified_as`.
    pub property: String,
    /// Type of the term entities.
    pub term_type: TypeId,
    pub terms: Vec<VocabularyTerm>,
}

/// Runtime realization of a class.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub id: TypeId,
    /// Ontology id of the class.
    pub class_id: String,
    /// Short name.
    pub name: String,
    pub label: String,
    pub description: String,
    pub usage: Usage,
    /// Direct parents in linkage order.
    pub parents: Vec<TypeId>,
    /// Self first, then ancestors closest first; the root is always last.
    pub ancestors: Vec<TypeId>,
    /// Properties declared on this type (inherited ones are looked up, not copied).
    pub properties: IndexMap<String, PropertyDef>,
    pub required: Vec<String>,
    pub recommended: Vec<String>,
    /// URI path segment for minted identifiers.
    pub segment: String,
    /// Set for vocabulary classes.
    pub classification: Option<Classification>,
}

impl TypeNode {
    pub fn new(id: TypeId, class_id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            class_id: class_id.into(),
            segment: name.clone(),
            name,
            label: String::new(),
            description: String::new(),
            usage: Usage::Allowed,
            parents: Vec::new(),
            ancestors: vec![id],
            properties: IndexMap::new(),
            required: Vec::new(),
            recommended: Vec::new(),
            classification: None,
        }
    }

    /// A property declared directly on this type.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    pub fn is_vocabulary(&self) -> bool {
        self.classification.is_some()
    }
}

/// A named combination of types instantiated together.
#[derive(Debug, Clone)]
pub struct Combination {
    pub name: String,
    pub segment: String,
    pub types: Vec<TypeId>,
}

impl Combination {
    /// Set equality against a list of types.
    pub fn matches(&self, types: &[TypeId]) -> bool {
        self.types.len() == types.len() && types.iter().all(|t| self.types.contains(t))
    }
}

/// Declaration of a vocabulary class.
#[derive(Debug, Clone)]
pub struct VocabularyClass {
    pub name: String,
    /// Ontology class the vocabulary class specializes (short name or id).
    pub parent: String,
    /// Property the terms are attached through.
    pub property: String,
    /// Type of the term entities (short name or id).
    pub term_type: String,
    pub terms: Vec<VocabularyTerm>,
}

impl VocabularyClass {
    pub fn new(
        name: impl Into<String>,
        parent: impl Into<String>,
        property: impl Into<String>,
        term_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            property: property.into(),
            term_type: term_type.into(),
            terms: Vec::new(),
        }
    }

    pub fn with_term(mut self, uri: impl Into<String>, label: impl Into<String>) -> Self {
        self.terms.push(VocabularyTerm {
            uri: uri.into(),
            label: label.into(),
        });
        self
    }
}


/// A shared entity known by name, such as a currency or a text-type term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedInstance {
    pub name: String,
    pub type_id: TypeId,
    pub uri: String,
    pub label: String,
}
