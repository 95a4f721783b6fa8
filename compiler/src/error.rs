//! Compiler error types.

use thiserror::Error;

/// Errors that can occur while compiling a schema or loading a context.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A row has too few columns or an unparseable cell.
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Unknown row kind '{0}'")]
    UnknownRowKind(String),

    #[error("Invalid short name '{0}'")]
    InvalidName(String),

    #[error("Duplicate class '{0}'")]
    DuplicateClass(String),

    #[error("Duplicate property '{name}' on class '{class}'")]
    DuplicateProperty { class: String, name: String },

    #[error("Invalid {column} flag '{value}'")]
    InvalidFlag { column: String, value: String },

    #[error("Invalid name pattern: {0}")]
    Pattern(String),

    #[error("Invalid context document: {0}")]
    Context(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Any of the above, located at a schema line.
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRow(message.into())
    }

    pub fn invalid_flag(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFlag {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Attach a line number.
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;
