/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("connection pool lock poisoned: {reason}")]
    PoolPoisoned { reason: String },
}
