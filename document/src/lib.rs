//! Ontic Document
//!
//! Conversion between entity graphs and nested JSON documents.
//!
//! Responsibilities:
//! - Serialize an entity into an ordered, cycle-safe document tree
//! - Decide embed-vs-reference per edge through a boundary policy
//! - Deserialize documents back into entities, resolving forward references
//! - Write documents as text or files

mod boundary;
mod config;
mod deserializer;
mod factory;
mod literal;
mod serializer;

pub use boundary::{BoundaryPolicy, ClassBoundaryBuilder, ClassBoundaryPolicy, EmbedAll};
pub use config::{DocumentConfig, TextMode};
pub use deserializer::Deserializer;
pub use factory::Factory;
pub use ontic_core::Naming;
pub use serializer::Serializer;
