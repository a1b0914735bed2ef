//! Error types for VEIL.

use thiserror::Error;

/// VEIL error types.
///
/// Errors are surfaced at the point of invocation; nothing inside the
/// tick pipeline is permitted to fail.
#[derive(Debug, Error)]
pub enum VeilError {
    /// NPC registry is at its configured maximum.
    #[error("maximum NPC count ({0}) reached")]
    CapacityExceeded(usize),

    /// NPC or location id collision.
    #[error("id {0:?} already exists")]
    DuplicateId(String),

    /// Missing NPC or edge endpoint.
    #[error("{0} not found")]
    NotFound(String),

    /// A supplied vector has the wrong length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Declared dimension for the vector kind.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// Snapshot is missing a required key or is malformed.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type alias using VeilError.
pub type Result<T> = std::result::Result<T, VeilError>;
