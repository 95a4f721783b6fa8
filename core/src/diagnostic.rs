//! The diagnostic channel.
//!
//! Diagnostics report soft problems (recommended attributes left unset,
//! warn-level profile usage) without failing the call. Their verbosity is
//! configurable: drop them, log and record them, or promote them to errors.

use crate::{ModelError, ModelResult};
use serde::Deserialize;
use std::str::FromStr;
use tracing::warn;

/// How diagnostics are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Silent,
    #[default]
    Warn,
    Error,
}

impl FromStr for DiagnosticLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(DiagnosticLevel::Silent),
            "warn" => Ok(DiagnosticLevel::Warn),
            "error" => Ok(DiagnosticLevel::Error),
            other => Err(ModelError::configuration(format!(
                "unknown diagnostic level '{}'",
                other
            ))),
        }
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What the diagnostic is about (a type, property or entity identity).
    pub subject: String,
    pub message: String,
}

/// Collector for diagnostics at a configured level.
#[derive(Debug, Default)]
pub struct Diagnostics {
    level: DiagnosticLevel,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(level: DiagnosticLevel) -> Self {
        Self {
            level,
            entries: Vec::new(),
        }
    }

    pub fn level(&self) -> DiagnosticLevel {
        self.level
    }

    pub fn set_level(&mut self, level: DiagnosticLevel) {
        self.level = level;
    }

    /// Report a diagnostic. Fails only at the `Error` level.
    pub fn report(
        &mut self,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> ModelResult<()> {
        let subject = subject.into();
        let message = message.into();
        match self.level {
            DiagnosticLevel::Silent => Ok(()),
            DiagnosticLevel::Warn => {
                warn!(subject = %subject, "{}", message);
                self.entries.push(Diagnostic { subject, message });
                Ok(())
            }
            DiagnosticLevel::Error => Err(ModelError::Warning(format!("{}: {}", subject, message))),
        }
    }

    /// Diagnostics recorded so far.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the recorded diagnostics, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
