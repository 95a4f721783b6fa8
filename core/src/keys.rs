//! Reserved document keys and well-known names shared across components.

/// Document key carrying the context pointer (root only).
pub const CONTEXT_KEY: &str = "@context";

/// Identity key in short naming mode.
pub const ID_KEY: &str = "id";
/// Type key in short naming mode.
pub const TYPE_KEY: &str = "type";
/// Identity key in full naming mode.
pub const FULL_ID_KEY: &str = "@id";
/// Type key in full naming mode.
pub const FULL_TYPE_KEY: &str = "@type";

pub const LABEL: &str = "label";
pub const VALUE: &str = "value";
pub const DESCRIPTION: &str = "description";

pub const LABEL_ID: &str = "rdfs:label";
pub const VALUE_ID: &str = "rdf:value";
pub const DESCRIPTION_ID: &str = "dc:description";

/// Ontology id of the synthetic root class.
pub const ROOT_CLASS_ID: &str = "rdfs:Resource";
/// Short name of the synthetic root class.
pub const ROOT_CLASS_NAME: &str = "BaseResource";

/// Attribute names starting with this character are internal.
pub const INTERNAL_PREFIX: char = '_';

/// Returns true for internal attribute names (never validated or serialized).
pub fn is_internal(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}

/// Returns true for keys that carry identity or type rather than a property.
pub fn is_structural(key: &str) -> bool {
    matches!(
        key,
        CONTEXT_KEY | ID_KEY | TYPE_KEY | FULL_ID_KEY | FULL_TYPE_KEY
    )
}
