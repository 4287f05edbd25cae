//! The single write connection. All mutations are serialized through it,
//! which is also what gives mutation + audit append their shared
//! transaction scope.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use safespace_core::errors::{SafespaceError, SafespaceResult, StorageError};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Mutex-guarded writer connection.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the writer for the given database file.
    pub fn open(path: &Path) -> SafespaceResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory writer (for testing).
    pub fn open_in_memory() -> SafespaceResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the writer.
    pub fn with_conn_sync<F, T>(&self, f: F) -> SafespaceResult<T>
    where
        F: FnOnce(&Connection) -> SafespaceResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| {
            SafespaceError::Storage(StorageError::PoolPoisoned {
                reason: e.to_string(),
            })
        })?;
        f(&guard)
    }
}
