//! v002: append-only audit_log table. No UPDATE or DELETE path exists in
//! the query layer; retention purge is the single sanctioned remover.

use rusqlite::Connection;

use safespace_core::errors::SafespaceResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SafespaceResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS audit_log (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            action      TEXT NOT NULL,
            actor_id    TEXT,
            report_id   TEXT,
            details     TEXT NOT NULL DEFAULT '{}',
            timestamp   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_audit_report ON audit_log(report_id);
        CREATE INDEX IF NOT EXISTS idx_audit_action ON audit_log(action);
        CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
