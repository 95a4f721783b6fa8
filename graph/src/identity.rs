//! Identifier issuance.

use crate::IdScheme;
use ontic_core::{EntityId, Identity};
use std::collections::HashMap;
use uuid::Uuid;

/// Allocator for arena handles.
#[derive(Debug, Clone)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn alloc(&mut self) -> EntityId {
        let id = EntityId::new(self.next);
        self.next += 1;
        id
    }
}

/// Issues public identities for new entities.
#[derive(Debug, Clone)]
pub(crate) struct IdMinter {
    scheme: IdScheme,
    base_url: String,
    next_blank: u64,
    counters: HashMap<String, u64>,
}

impl IdMinter {
    pub(crate) fn new(scheme: IdScheme, base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            scheme,
            base_url,
            next_blank: 1,
            counters: HashMap::new(),
        }
    }

    /// Mint a fresh identity; `taken` guards against labels already in use.
    pub(crate) fn mint(&mut self, segment: &str, taken: impl Fn(&Identity) -> bool) -> Identity {
        loop {
            let identity = match self.scheme {
                IdScheme::Blank => {
                    let label = format!("b{}", self.next_blank);
                    self.next_blank += 1;
                    Identity::Blank(label)
                }
                IdScheme::Counter => {
                    let counter = self.counters.entry(segment.to_string()).or_insert(0);
                    *counter += 1;
                    Identity::Uri(format!("{}{}/{}", self.base_url, segment, counter))
                }
                IdScheme::Uuid => {
                    Identity::Uri(format!("{}{}/{}", self.base_url, segment, Uuid::new_v4()))
                }
            };
            if !taken(&identity) {
                return identity;
            }
        }
    }

    /// Identity for an explicitly supplied identifier.
    pub(crate) fn explicit(&self, segment: &str, ident: &str) -> Identity {
        if ident.starts_with(ontic_core::BLANK_PREFIX) || is_absolute(ident) {
            Identity::parse(ident)
        } else {
            Identity::Uri(format!("{}{}/{}", self.base_url, segment, ident))
        }
    }
}

/// True for identifiers used verbatim: `http...` or any `scheme:` IRI.
pub fn is_absolute(ident: &str) -> bool {
    if ident.starts_with("http") {
        return true;
    }
    match ident.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
