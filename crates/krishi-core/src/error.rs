//! Core error type.

use krishi_store::StorageError;
use thiserror::Error;

/// Errors surfaced by the business-logic layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-supplied input failed validation (maps to 400).
    #[error("{0}")]
    Validation(String),

    /// A referenced resource does not exist (maps to 404).
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness invariant would be violated (maps to 409).
    #[error("{0}")]
    Conflict(String),

    /// Storage layer failure (maps to 500).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Anything else unexpected (maps to 500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result alias using [`CoreError`].
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Maps a `spawn_blocking` join failure into a core error.
pub fn join_err(e: tokio::task::JoinError) -> CoreError {
    CoreError::Internal(format!("blocking task failed: {}", e))
}
