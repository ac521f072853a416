//! Engine error types.
//!
//! Internal operations use these; public service methods catch them at the
//! boundary and render them into the `error` field of their result shape.
//! Display strings are the user-facing messages the surrounding application
//! shows verbatim.

use sca_types::{AccessError, SheetState, StoreError};
use thiserror::Error;

/// Errors raised inside engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller failed the role check.
    #[error("{0}")]
    Access(#[from] AccessError),

    /// Input rejected before any write.
    #[error("{0}")]
    Validation(String),

    /// Sheet resolved by number or id was absent.
    #[error("Hoja no encontrada.")]
    SheetNotFound,

    /// Leader resolved by id was absent.
    #[error("Líder no encontrado.")]
    LeaderNotFound,

    /// Leader exists but was soft-deleted; edits and assignments reject it.
    #[error("El líder fue eliminado.")]
    LeaderDeleted,

    /// The narrow receive transition found the sheet in another state.
    #[error("La hoja no está en circulación (estado actual: {current}).")]
    NotInCirculation { current: SheetState },

    /// Store failure attributed to one adhesion line.
    #[error("Línea {line}: {source}")]
    LineStore { line: u8, source: StoreError },

    /// Store failure not attributable to a single item.
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Result type for internal engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
