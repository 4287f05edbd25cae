//! Key/value system configuration with audited writes.

use rusqlite::{params, Connection};

use safespace_core::audit::AuditAction;
use safespace_core::config::RetentionConfig;
use safespace_core::constants::{DEFAULT_AUDIT_RETENTION_DAYS, DEFAULT_REPORT_RETENTION_DAYS};
use safespace_core::errors::SafespaceResult;

use super::{audit_ops, OptionalRow};
use crate::{to_storage_err, to_tx_err};

pub const REPORT_RETENTION_KEY: &str = "report_retention_days";
pub const AUDIT_RETENTION_KEY: &str = "audit_retention_days";

pub fn get_config(conn: &Connection, key: &str) -> SafespaceResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM system_config WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Upsert a config value. The old value is carried in the audit detail so
/// configuration history is reconstructible from the trail alone.
pub fn set_config(
    conn: &Connection,
    key: &str,
    value: &str,
    actor_id: Option<&str>,
) -> SafespaceResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_tx_err(format!("set_config begin: {e}")))?;

    let result = (|| {
        let old = get_config(&tx, key)?;
        tx.execute(
            "INSERT INTO system_config (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

        let details = serde_json::json!({
            "key": key,
            "old_value": old,
            "new_value": value,
        });
        audit_ops::append(&tx, AuditAction::ConfigChanged, actor_id, None, &details)
    })();

    match result {
        Ok(_) => tx
            .commit()
            .map_err(|e| to_tx_err(format!("set_config commit: {e}"))),
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Retention windows from stored config, falling back to the defaults
/// when a key is absent or unparseable.
pub fn retention_config(conn: &Connection) -> SafespaceResult<RetentionConfig> {
    Ok(RetentionConfig {
        report_retention_days: parse_days(
            get_config(conn, REPORT_RETENTION_KEY)?,
            DEFAULT_REPORT_RETENTION_DAYS,
        ),
        audit_retention_days: parse_days(
            get_config(conn, AUDIT_RETENTION_KEY)?,
            DEFAULT_AUDIT_RETENTION_DAYS,
        ),
    })
}

fn parse_days(value: Option<String>, default: u64) -> u64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
