//! # safespace-storage
//!
//! SQLite persistence layer for the report lifecycle: connection pool
//! (one writer, read-only companions under WAL), migrations, transactional report CRUD
//! with an append-only audit trail, the SystemConfig key-value store, and
//! retention maintenance.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::ReportStore;

use safespace_core::errors::{SafespaceError, StorageError};

/// Wrap a low-level SQLite failure into the workspace error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> SafespaceError {
    SafespaceError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}

/// Wrap a transaction begin/commit failure into the workspace error type.
pub(crate) fn to_tx_err(reason: impl Into<String>) -> SafespaceError {
    SafespaceError::Storage(StorageError::TransactionFailed {
        reason: reason.into(),
    })
}
