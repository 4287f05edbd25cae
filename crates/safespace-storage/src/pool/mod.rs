//! SQLite connection management: one mutex-guarded writer plus a fixed
//! set of read-only connections handed out round-robin. Under WAL the
//! readers are never blocked by the writer.

pub mod pragmas;
pub mod write_connection;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use safespace_core::errors::{SafespaceError, SafespaceResult, StorageError};

use crate::to_storage_err;
use pragmas::apply_read_pragmas;

pub use write_connection::WriteConnection;

/// Read connections opened for a file-backed store. Enough for the
/// handful of dashboard and listing queries that run concurrently.
const READ_CONNECTIONS: usize = 4;

/// The writer plus its read-only companions for one database.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    readers: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ConnectionPool {
    /// Open the writer and read connections for the given database file.
    pub fn open(path: &Path) -> SafespaceResult<Self> {
        let writer = WriteConnection::open(path)?;
        let mut readers = Vec::with_capacity(READ_CONNECTIONS);
        for _ in 0..READ_CONNECTIONS {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            apply_read_pragmas(&conn)?;
            readers.push(Mutex::new(conn));
        }
        Ok(Self {
            writer,
            readers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Open an in-memory pool (for testing). In-memory connections are
    /// each their own database, so no readers are opened and all reads
    /// fall through to the writer.
    pub fn open_in_memory() -> SafespaceResult<Self> {
        let writer = WriteConnection::open_in_memory()?;
        Ok(Self {
            writer,
            readers: Vec::new(),
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run a read-only closure on the next reader, falling back to the
    /// writer when the pool has none.
    pub fn with_read_conn<F, T>(&self, f: F) -> SafespaceResult<T>
    where
        F: FnOnce(&Connection) -> SafespaceResult<T>,
    {
        if self.readers.is_empty() {
            return self.writer.with_conn_sync(f);
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let guard = self.readers[idx].lock().map_err(|e| {
            SafespaceError::Storage(StorageError::PoolPoisoned {
                reason: e.to_string(),
            })
        })?;
        f(&guard)
    }
}
