//! Storage error types.

use thiserror::Error;

use crate::game::MatchError;

/// Reasons a save can't be read or written. These stay inside the
/// store; callers only ever see a missing match.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not JSON, or not shaped like a saved match
    #[error("Malformed save: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by an incompatible version
    #[error("Unsupported save schema: {found:?}")]
    SchemaMismatch { found: Option<u64> },

    /// Parsed, but the match inside breaks its own invariants
    #[error("Corrupted match: {0}")]
    Corrupted(#[from] MatchError),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
