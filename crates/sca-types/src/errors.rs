//! Shared store error surface.

use thiserror::Error;

/// Errors surfaced by the entity-store collaborators.
///
/// The store is external; the engine only depends on this shape. Messages
/// are embedded verbatim into per-item error strings by the services.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// A referenced parent row does not exist.
    #[error("foreign key violation: {constraint}")]
    ForeignKey { constraint: String },

    /// Backend failure, carrying the store's own message.
    #[error("{0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
