//! Ontic Core Types
//!
//! This crate provides the foundational types used throughout Ontic:
//! - Identity types (EntityId, TypeId, Identity)
//! - Value types (the Value enum for literals, references and lists)
//! - The Entity structure
//! - The error taxonomy and the diagnostic channel
//! - Reserved document keys and the canonical key order

mod diagnostic;
mod entity;
mod error;
mod id;
pub mod keys;
mod order;
mod value;

pub use diagnostic::*;
pub use entity::*;
pub use error::*;
pub use id::*;
pub use order::*;
pub use value::*;
