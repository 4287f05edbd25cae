//! Append and read operations on the audit trail. There is deliberately
//! no update or delete here: entries are immutable once written.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use safespace_core::audit::{AuditAction, AuditEntry};
use safespace_core::errors::SafespaceResult;

use crate::to_storage_err;

/// Append one audit entry. Returns the new rowid.
pub fn append(
    conn: &Connection,
    action: AuditAction,
    actor_id: Option<&str>,
    report_id: Option<&str>,
    details: &serde_json::Value,
) -> SafespaceResult<i64> {
    let details_json =
        serde_json::to_string(details).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO audit_log (action, actor_id, report_id, details, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            action.as_str(),
            actor_id,
            report_id,
            details_json,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// All entries for one report, oldest first.
pub fn for_report(conn: &Connection, report_id: &str) -> SafespaceResult<Vec<AuditEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, action, actor_id, report_id, details, timestamp
             FROM audit_log WHERE report_id = ?1 ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_entries(&mut stmt, params![report_id])
}

/// The most recent entries across all reports, newest first.
pub fn recent(conn: &Connection, limit: usize) -> SafespaceResult<Vec<AuditEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, action, actor_id, report_id, details, timestamp
             FROM audit_log ORDER BY id DESC LIMIT ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_entries(&mut stmt, params![limit])
}

/// Total number of audit entries.
pub fn count(conn: &Connection) -> SafespaceResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

fn collect_entries(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> SafespaceResult<Vec<AuditEntry>> {
    let rows = stmt
        .query_map(params, |row| {
            let action_str: String = row.get(1)?;
            let details_json: String = row.get(4)?;
            let ts_str: String = row.get(5)?;
            Ok((
                row.get::<_, i64>(0)?,
                action_str,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                details_json,
                ts_str,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, action_str, actor_id, report_id, details_json, ts_str) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let action = AuditAction::parse(&action_str)
            .ok_or_else(|| to_storage_err(format!("unknown audit action '{action_str}'")))?;
        let details: serde_json::Value = serde_json::from_str(&details_json)
            .map_err(|e| to_storage_err(format!("parse audit details: {e}")))?;
        let timestamp = parse_timestamp(&ts_str)?;
        entries.push(AuditEntry {
            id,
            action,
            actor_id,
            report_id,
            details,
            timestamp,
        });
    }
    Ok(entries)
}

fn parse_timestamp(s: &str) -> SafespaceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse audit timestamp '{s}': {e}")))
}
