//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// data-set integrity, missing records). Infrastructure concerns belong
/// elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A compiled-in or edited data set is malformed (e.g. a checklist option
    /// points at a node that does not exist). Fatal at load time: the
    /// affected feature must refuse to start.
    #[error("data integrity: {0}")]
    DataIntegrity(String),

    /// A value failed validation (e.g. missing mandatory media, empty
    /// required field). Recoverable; the operation is a no-op.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An external resource failed (template fetch/parse, persisted-state
    /// read). Recoverable; no automatic retry.
    #[error("resource failure: {0}")]
    Resource(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. duplicate identifier, illegal status move).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn data_integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
