//! Error types for the stakehouse wagering service
//!
//! One flat taxonomy shared by the ledger, the resolver, and the API
//! layer. Every validation failure aborts the in-flight transaction
//! before any write is staged, so surfacing one of these never leaves
//! partial state behind.

use thiserror::Error;

/// Root error type for all wagering operations
#[derive(Debug, Error)]
pub enum WagerError {
    /// Missing or malformed request fields, non-positive stakes
    #[error("{0}")]
    InvalidInput(String),

    /// User or game absent, or game not owned by the requesting user
    #[error("{0}")]
    NotFound(String),

    /// Stake exceeds the user's current balance
    #[error("Insufficient balance")]
    InsufficientFunds { balance: f64, stake: f64 },

    /// Missing or unknown authentication token
    #[error("{0}")]
    Unauthorized(String),

    /// Underlying store failure (read, write, or commit)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted record failed to decode
    #[error("Corrupted record: {0}")]
    Corrupted(String),

    /// Invalid engine or service configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WagerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        WagerError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        WagerError::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        WagerError::Unauthorized(msg.into())
    }
}

impl From<rocksdb::Error> for WagerError {
    fn from(e: rocksdb::Error) -> Self {
        WagerError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for WagerError {
    fn from(e: serde_json::Error) -> Self {
        WagerError::Corrupted(e.to_string())
    }
}

/// Convenience alias used throughout the crate
pub type WagerResult<T> = Result<T, WagerError>;
