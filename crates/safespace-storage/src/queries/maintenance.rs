//! Retention enforcement and space reclamation.

use rusqlite::{params, Connection};

use safespace_core::config::RetentionConfig;
use safespace_core::errors::SafespaceResult;

use crate::{to_storage_err, to_tx_err};

/// Rows removed by a purge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub reports_purged: usize,
    pub audit_entries_purged: usize,
}

/// Delete reports and audit entries older than their retention windows.
///
/// The two deletes run in one transaction so a partial purge never
/// commits. A zero retention window disables purging for that table.
pub fn purge_expired(
    conn: &Connection,
    retention: &RetentionConfig,
) -> SafespaceResult<PurgeOutcome> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_tx_err(format!("purge begin: {e}")))?;

    let result = (|| {
        let mut outcome = PurgeOutcome::default();
        if retention.report_retention_days > 0 {
            outcome.reports_purged = tx
                .execute(
                    "DELETE FROM reports
                     WHERE julianday('now') - julianday(created_at) > ?1",
                    params![retention.report_retention_days as i64],
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
        }
        if retention.audit_retention_days > 0 {
            outcome.audit_entries_purged = tx
                .execute(
                    "DELETE FROM audit_log
                     WHERE julianday('now') - julianday(timestamp) > ?1",
                    params![retention.audit_retention_days as i64],
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
        }
        Ok(outcome)
    })();

    match result {
        Ok(outcome) => {
            tx.commit()
                .map_err(|e| to_tx_err(format!("purge commit: {e}")))?;
            Ok(outcome)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Rebuild the database file to reclaim freed pages.
pub fn full_vacuum(conn: &Connection) -> SafespaceResult<()> {
    conn.execute_batch("VACUUM")
        .map_err(|e| to_storage_err(e.to_string()))
}
