//! Error taxonomy for the SafeSpace pipeline.
//!
//! One enum per subsystem plus the umbrella [`SafespaceError`].
//! Model unavailability is deliberately NOT an error: detection degrades
//! instead of failing, so no variant exists for it.

mod crypto_error;
mod storage_error;

pub use crypto_error::CryptoError;
pub use storage_error::StorageError;

/// Umbrella error for all SafeSpace operations.
#[derive(Debug, thiserror::Error)]
pub enum SafespaceError {
    /// The requested report does not exist.
    #[error("report not found: {id}")]
    ReportNotFound { id: String },

    /// Malformed input: bad patch, bad filter, illegal state transition.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SafespaceError {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the workspace.
pub type SafespaceResult<T> = Result<T, SafespaceError>;
