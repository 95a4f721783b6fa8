//! Ontic Schema Compiler
//!
//! Transform a tab-separated ontology schema into class and property descriptors.
//!
//! Responsibilities:
//! - Parse class and property rows
//! - Validate short names and flags
//! - File each property under its domain class (or the synthetic root)
//! - Merge display-order hints into the shared key-order table
//! - Load JSON context documents

mod compiler;
mod context;
mod descriptor;
mod error;
mod schema;

pub use compiler::{compile, Compiler};
pub use context::{ContextDocument, TermDefinition};
pub use descriptor::{ClassDescriptor, PropertyDescriptor, Usage};
pub use error::{CompileError, CompileResult};
pub use schema::Schema;
