//! Error taxonomy shared by the object model and the document codec.

use crate::EntityId;
use thiserror::Error;

/// Errors raised while building, validating or (de)serializing entities.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Misconfigured model or factory (missing output target, unset context).
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown property '{property}' on type '{type_name}'")]
    UnknownProperty { type_name: String, property: String },

    #[error("Type mismatch on '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        property: String,
        expected: String,
        actual: String,
    },

    /// The profile disallows a class or property.
    #[error("Profile violation: {what} is not allowed by the profile")]
    ProfileViolation { what: String },

    #[error("Type '{type_name}' requires '{property}' to be set")]
    MissingRequiredProperty { type_name: String, property: String },

    #[error("Ambiguous type: no known combination of [{}]", .types.join(", "))]
    AmbiguousType { types: Vec<String> },

    #[error("Unresolved reference '{target}' from '{owner}' via '{property}'")]
    UnresolvedReference {
        owner: String,
        property: String,
        target: String,
    },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Unknown type '{0}'")]
    UnknownType(String),

    #[error("Unknown named instance '{0}'")]
    UnknownInstance(String),

    /// Strict multiplicity rejected a second value for a single-valued slot.
    #[error("Property '{property}' on '{type_name}' takes a single value")]
    TooManyValues { type_name: String, property: String },

    #[error("Reserved name '{0}' cannot be assigned")]
    ReservedName(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A diagnostic promoted to an error by the `error` diagnostic level.
    #[error("Warning promoted to error: {0}")]
    Warning(String),
}

impl ModelError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn type_mismatch(
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            property: property.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn profile_violation(what: impl Into<String>) -> Self {
        Self::ProfileViolation { what: what.into() }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        Self::Configuration(format!("I/O failure: {}", err))
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
