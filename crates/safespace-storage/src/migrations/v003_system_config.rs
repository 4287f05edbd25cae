//! v003: system_config key-value store for tunables.

use rusqlite::Connection;

use safespace_core::errors::SafespaceResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SafespaceResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS system_config (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
