//! Error types for bvsls.
//!
//! Envelope infeasibility during search is reported through `bool` returns on
//! the hot paths. This enum covers the cold paths where a collaborator can hand
//! the engine inconsistent input: range updates that empty the envelope, pins
//! outside the bit-width, and configuration loading.

use thiserror::Error;

/// The main error type for bvsls operations.
#[derive(Error, Debug)]
pub enum SlsError {
    /// Bit-width must be at least one bit
    #[error("Invalid bit-width: {0}")]
    InvalidBitWidth(usize),

    /// Bit index out of bounds
    #[error("Index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds {
        /// The index that was accessed
        index: usize,
        /// The valid length
        length: usize,
    },

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No fixed-consistent value lies inside the interval
    #[error("Empty envelope: no value consistent with fixed bits in [{lo}, {hi}[")]
    EmptyEnvelope {
        /// Lower bound (decimal)
        lo: String,
        /// Upper bound (decimal)
        hi: String,
    },

    /// Binary serialization error occurred
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON serialization error occurred
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for bvsls operations.
pub type Result<T> = std::result::Result<T, SlsError>;
