//! Ontic Registry
//!
//! The runtime type system built from a compiled schema.
//!
//! Responsibilities:
//! - Build one type node per class, merging multiple parent linkages
//! - Resolve property ranges and inverses
//! - Answer property lookups through the ancestor chain
//! - Hold profile data (usage, required and recommended attributes)
//! - Hold multi-type combinations and vocabulary classes

mod builder;
mod registry;
mod types;

pub use builder::{HierarchyBuilder, RegistryError};
pub use ontic_compiler::Usage;
pub use registry::Registry;
pub use types::*;
