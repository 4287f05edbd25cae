//! Schema migrations, tracked via `PRAGMA user_version`.

mod v001_reports;
mod v002_audit_log;
mod v003_system_config;

use rusqlite::Connection;

use safespace_core::errors::{SafespaceError, SafespaceResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> SafespaceResult<()>;

/// All migrations in order. Append-only: never edit a shipped entry.
const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_reports::migrate),
    (2, v002_audit_log::migrate),
    (3, v003_system_config::migrate),
];

/// Run all pending migrations on the given connection.
pub fn run_migrations(conn: &Connection) -> SafespaceResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            SafespaceError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::debug!(version, "applied migration");
    }
    Ok(())
}

/// The schema version the binary expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}
