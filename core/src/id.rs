//! Identity types for Ontic entities and types.
//!
//! Two kinds of identifier live side by side:
//! - Handles (`EntityId`, `TypeId`) are cheap, copyable, and only meaningful
//!   inside the graph or registry that issued them.
//! - `Identity` is the public name of an entity as it appears in documents:
//!   a URI or a blank node label.

use std::fmt;

/// Handle of an entity inside a graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create a new EntityId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Handle of a type node inside a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Prefix that marks a blank node label in documents.
pub const BLANK_PREFIX: &str = "_:";

/// The public identity of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// A dereferenceable URI.
    Uri(String),
    /// A document-local blank node; the label excludes the `_:` prefix.
    Blank(String),
}

impl Identity {
    /// Parse an identifier as written in a document.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(BLANK_PREFIX) {
            Some(label) => Identity::Blank(label.to_string()),
            None => Identity::Uri(raw.to_string()),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Identity::Blank(_))
    }

    /// The URI, if this identity has one.
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Identity::Uri(uri) => Some(uri),
            Identity::Blank(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Uri(uri) => write!(f, "{}", uri),
            Identity::Blank(label) => write!(f, "{}{}", BLANK_PREFIX, label),
        }
    }
}
