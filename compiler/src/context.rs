//! JSON context documents.
//!
//! A context maps short names to ontology ids (optionally with a type hint
//! and container) and declares namespace prefixes. It drives full-name
//! rendering and lets the reader map full ids back to short names.

use crate::{CompileError, CompileResult};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

/// Type hint marking a term whose values are references.
pub const ID_HINT: &str = "@id";

/// One term of a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
    /// The compact id, e.g. `crm:P1_is_identified_by`.
    pub id: String,
    /// Value type hint, e.g. `@id` or `xsd:dateTime`.
    pub type_hint: Option<String>,
    pub container: Option<String>,
}

/// A parsed context document.
#[derive(Debug, Clone, Default)]
pub struct ContextDocument {
    prefixes: IndexMap<String, String>,
    terms: IndexMap<String, TermDefinition>,
}

impl ContextDocument {
    /// Parse context text: `{"@context": {...}}`, `{"@context": [...]}` or a bare map.
    pub fn parse(text: &str) -> CompileResult<Self> {
        let value: JsonValue = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> CompileResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn from_value(value: &JsonValue) -> CompileResult<Self> {
        let body = match value {
            JsonValue::Object(map) => map.get("@context").unwrap_or(value),
            _ => return Err(CompileError::Context("expected a JSON object".into())),
        };

        let mut context = Self::default();
        match body {
            JsonValue::Object(map) => context.merge_map(map)?,
            JsonValue::Array(items) => {
                for item in items {
                    // Remote context URLs in the list are not fetched
                    if let JsonValue::Object(map) = item {
                        context.merge_map(map)?;
                    }
                }
            }
            _ => return Err(CompileError::Context("@context must be an object or a list".into())),
        }
        Ok(context)
    }

    fn merge_map(&mut self, map: &Map<String, JsonValue>) -> CompileResult<()> {
        for (name, entry) in map {
            if name.starts_with('@') {
                continue;
            }
            match entry {
                JsonValue::String(iri) if iri.ends_with('/') || iri.ends_with('#') => {
                    self.prefixes.insert(name.clone(), iri.clone());
                }
                JsonValue::String(id) => {
                    self.terms.insert(
                        name.clone(),
                        TermDefinition {
                            id: id.clone(),
                            type_hint: None,
                            container: None,
                        },
                    );
                }
                JsonValue::Object(definition) => {
                    let id = definition
                        .get("@id")
                        .and_then(JsonValue::as_str)
                        .ok_or_else(|| {
                            CompileError::Context(format!("term '{}' has no @id", name))
                        })?;
                    let text = |key: &str| {
                        definition
                            .get(key)
                            .and_then(JsonValue::as_str)
                            .map(String::from)
                    };
                    self.terms.insert(
                        name.clone(),
                        TermDefinition {
                            id: id.to_string(),
                            type_hint: text("@type"),
                            container: text("@container"),
                        },
                    );
                }
                _ => {
                    return Err(CompileError::Context(format!(
                        "term '{}' must be a string or an object",
                        name
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn term(&self, name: &str) -> Option<&TermDefinition> {
        self.terms.get(name)
    }

    /// Short name of the term whose id matches `id` in compact or expanded form.
    pub fn term_for_id(&self, id: &str) -> Option<&str> {
        let expanded = self.expand(id);
        self.terms
            .iter()
            .find(|(_, term)| term.id == id || self.expand(&term.id) == expanded)
            .map(|(name, _)| name.as_str())
    }

    /// True when the term's values are references.
    pub fn is_reference(&self, name: &str) -> bool {
        self.terms
            .get(name)
            .and_then(|t| t.type_hint.as_deref())
            == Some(ID_HINT)
    }

    pub fn prefix(&self, name: &str) -> Option<&str> {
        self.prefixes.get(name).map(String::as_str)
    }

    /// Expand `prefix:local` into a full IRI; anything else is returned unchanged.
    pub fn expand(&self, compact: &str) -> String {
        if let Some((prefix, local)) = compact.split_once(':') {
            if let Some(iri) = self.prefixes.get(prefix) {
                return format!("{}{}", iri, local);
            }
        }
        compact.to_string()
    }

    /// Compact a full IRI with the longest matching prefix.
    pub fn compact(&self, iri: &str) -> String {
        self.prefixes
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()) && iri.len() > ns.len())
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
            .unwrap_or_else(|| iri.to_string())
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &TermDefinition)> {
        self.terms.iter().map(|(name, term)| (name.as_str(), term))
    }
}
