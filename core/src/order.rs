//! Canonical key order for documents.
//!
//! Keys are ranked by a table (smaller first); unlisted keys share a large
//! default rank and keep their relative order through a stable sort.

use crate::keys::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Rank of keys the table does not list.
pub const DEFAULT_KEY_ORDER: u32 = 10000;

/// Attribute naming mode of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    /// Short names (`id`, `type`, `label`).
    #[default]
    Short,
    /// Fully-qualified ontology ids (`@id`, `@type`, `rdfs:label`).
    Full,
}

/// Ranking table for document keys, one table per naming mode.
#[derive(Debug, Clone)]
pub struct KeyOrder {
    short: HashMap<String, u32>,
    full: HashMap<String, u32>,
}

/// Built-in ranks for short names.
const SHORT_RANKS: &[(&str, u32)] = &[
    (CONTEXT_KEY, 0),
    (ID_KEY, 1),
    (TYPE_KEY, 2),
    (LABEL, 5),
    (VALUE, 6),
    (DESCRIPTION, 7),
];

/// Built-in ranks for full ids.
const FULL_RANKS: &[(&str, u32)] = &[
    (CONTEXT_KEY, 0),
    (FULL_ID_KEY, 1),
    ("rdf:type", 2),
    (FULL_TYPE_KEY, 2),
    (LABEL_ID, 5),
    (VALUE_ID, 6),
    (DESCRIPTION_ID, 7),
];

impl Default for KeyOrder {
    fn default() -> Self {
        let table = |ranks: &[(&str, u32)]| -> HashMap<String, u32> {
            ranks.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };
        Self {
            short: table(SHORT_RANKS),
            full: table(FULL_RANKS),
        }
    }
}

impl KeyOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a display-order hint for a property known by both names.
    /// A hint equal to the default rank carries no information and is skipped.
    /// Keys in the built-in table keep their rank; for any other key the
    /// latest hint wins.
    pub fn merge_hint(&mut self, short: &str, full: &str, order: u32) {
        if order == DEFAULT_KEY_ORDER {
            return;
        }
        if !is_builtin(SHORT_RANKS, short) {
            self.short.insert(short.to_string(), order);
        }
        if !is_builtin(FULL_RANKS, full) {
            self.full.insert(full.to_string(), order);
        }
    }

    /// Rank of a key under the given naming mode.
    pub fn rank(&self, key: &str, naming: Naming) -> u32 {
        let table = match naming {
            Naming::Short => &self.short,
            Naming::Full => &self.full,
        };
        table.get(key).copied().unwrap_or(DEFAULT_KEY_ORDER)
    }

    /// Stable-sort keyed entries into canonical order.
    pub fn sort<T>(&self, entries: &mut [(String, T)], naming: Naming) {
        entries.sort_by_key(|(key, _)| self.rank(key, naming));
    }
}

fn is_builtin(ranks: &[(&str, u32)], key: &str) -> bool {
    ranks.iter().any(|(k, _)| *k == key)
}
