//! v001: reports table.

use rusqlite::Connection;

use safespace_core::errors::SafespaceResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SafespaceResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reports (
            id                TEXT PRIMARY KEY,
            encrypted_payload TEXT NOT NULL,
            channel_id        TEXT NOT NULL,
            source            TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'pending',
            severity          TEXT,
            categories        TEXT NOT NULL DEFAULT '[]',
            metadata          TEXT NOT NULL DEFAULT '{}',
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL,
            reviewed_by       TEXT,
            review_notes      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_reports_status ON reports(status);
        CREATE INDEX IF NOT EXISTS idx_reports_severity ON reports(severity);
        CREATE INDEX IF NOT EXISTS idx_reports_source ON reports(source);
        CREATE INDEX IF NOT EXISTS idx_reports_created ON reports(created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
