//! Ontic Graph
//!
//! Entity storage and the validated assignment path.
//!
//! Entities live in an arena and refer to each other through `EntityId`
//! handles, so cyclic graphs need no shared ownership.

mod assign;
mod config;
mod graph;
mod identity;

pub use config::{IdScheme, ModelConfig, Multiplicity};
pub use graph::{Checkpoint, EntityBuilder, Graph};
pub use identity::is_absolute;
