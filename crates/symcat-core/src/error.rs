use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Collaborator-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    NotReady,
}

/// Structured error reported by an upstream collaborator.
///
/// The engine never surfaces these to its own callers; they are logged and
/// the affected cycle degrades to an empty catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotReady,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NotReady => "source.not_ready",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Top-level error type for local catalog operations (loading input and
/// configuration, driving refresh cycles).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("refresh cycle terminated abnormally: {0}")]
    CycleAborted(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
