//! Insert, get, update, delete for reports.
//!
//! Every mutation shares a transaction with its audit append: all-or-
//! nothing. NotFound and transition validation are checked before any
//! audit write, so rejected actions leave no trace in the trail.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use safespace_core::audit::AuditAction;
use safespace_core::errors::{SafespaceError, SafespaceResult};
use safespace_core::report::{Report, ReportPatch, ReportSeverity, ReportSource, ReportStatus};

use super::{audit_ops, OptionalRow};
use crate::{to_storage_err, to_tx_err};

/// The base SELECT columns for all report queries (12 columns, indices 0-11).
pub(crate) const REPORT_COLUMNS: &str =
    "id, encrypted_payload, channel_id, source, status, severity,
     categories, metadata, created_at, updated_at, reviewed_by, review_notes";

/// Insert a report and its `report_created` audit entry atomically.
pub fn create_report(
    conn: &Connection,
    report: &Report,
    actor_id: Option<&str>,
) -> SafespaceResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_tx_err(format!("create_report begin: {e}")))?;

    match create_report_inner(&tx, report, actor_id) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_tx_err(format!("create_report commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn create_report_inner(
    conn: &Connection,
    report: &Report,
    actor_id: Option<&str>,
) -> SafespaceResult<()> {
    let categories_json =
        serde_json::to_string(&report.categories).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json =
        serde_json::to_string(&report.metadata).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO reports (
            id, encrypted_payload, channel_id, source, status, severity,
            categories, metadata, created_at, updated_at, reviewed_by, review_notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            report.id,
            report.encrypted_payload,
            report.channel_id,
            report.source.as_str(),
            report.status.as_str(),
            report.severity.map(|s| s.as_str()),
            categories_json,
            metadata_json,
            report.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            report.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            report.reviewed_by,
            report.review_notes,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let details = serde_json::json!({
        "source": report.source.as_str(),
        "channel_id": report.channel_id,
        "severity": report.severity.map(|s| s.as_str()),
    });
    audit_ops::append(
        conn,
        AuditAction::ReportCreated,
        actor_id,
        Some(&report.id),
        &details,
    )?;
    Ok(())
}

/// Get a single report by id.
pub fn get_report(conn: &Connection, id: &str) -> SafespaceResult<Option<Report>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id], |row| Ok(row_to_report(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(report) => Ok(Some(report?)),
        None => Ok(None),
    }
}

/// Apply a partial update and append its audit entry atomically.
/// Returns the updated report.
pub fn update_report(
    conn: &Connection,
    id: &str,
    patch: &ReportPatch,
    actor_id: Option<&str>,
) -> SafespaceResult<Report> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_tx_err(format!("update_report begin: {e}")))?;

    match update_report_inner(&tx, id, patch, actor_id) {
        Ok(report) => {
            tx.commit()
                .map_err(|e| to_tx_err(format!("update_report commit: {e}")))?;
            Ok(report)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn update_report_inner(
    conn: &Connection,
    id: &str,
    patch: &ReportPatch,
    actor_id: Option<&str>,
) -> SafespaceResult<Report> {
    let old = get_report(conn, id)?.ok_or_else(|| SafespaceError::ReportNotFound {
        id: id.to_string(),
    })?;

    // Validate the status transition before anything is written.
    if let Some(next) = patch.status {
        if !old.status.can_transition_to(next) {
            return Err(SafespaceError::validation(format!(
                "illegal status transition: {} -> {}",
                old.status, next
            )));
        }
    }

    // Partial-update semantics: omitted fields stay untouched.
    let new_status = patch.status.unwrap_or(old.status);
    let new_severity = patch.severity.or(old.severity);
    let new_reviewed_by = patch.reviewed_by.clone().or_else(|| old.reviewed_by.clone());
    let new_review_notes = patch
        .review_notes
        .clone()
        .or_else(|| old.review_notes.clone());
    let updated_at = Utc::now().max(old.updated_at);

    conn.execute(
        "UPDATE reports SET
            status = ?2, severity = ?3, reviewed_by = ?4, review_notes = ?5,
            updated_at = ?6
         WHERE id = ?1",
        params![
            id,
            new_status.as_str(),
            new_severity.map(|s| s.as_str()),
            new_reviewed_by,
            new_review_notes,
            updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let details = serde_json::json!({
        "old_status": old.status.as_str(),
        "new_status": new_status.as_str(),
        "old_severity": old.severity.map(|s| s.as_str()),
        "new_severity": new_severity.map(|s| s.as_str()),
    });
    audit_ops::append(
        conn,
        AuditAction::ReportUpdated,
        actor_id,
        Some(id),
        &details,
    )?;

    Ok(Report {
        status: new_status,
        severity: new_severity,
        reviewed_by: new_reviewed_by,
        review_notes: new_review_notes,
        updated_at,
        ..old
    })
}

/// Delete a report. The audit entry is written BEFORE the row delete, in
/// the same transaction, so the trail survives even if the delete fails.
pub fn delete_report(
    conn: &Connection,
    id: &str,
    actor_id: Option<&str>,
) -> SafespaceResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_tx_err(format!("delete_report begin: {e}")))?;

    match delete_report_inner(&tx, id, actor_id) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_tx_err(format!("delete_report commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn delete_report_inner(conn: &Connection, id: &str, actor_id: Option<&str>) -> SafespaceResult<()> {
    // NotFound is checked before the audit write: a rejected delete must
    // leave no audit row.
    let existing = get_report(conn, id)?.ok_or_else(|| SafespaceError::ReportNotFound {
        id: id.to_string(),
    })?;

    let details = serde_json::json!({
        "status_at_deletion": existing.status.as_str(),
        "source": existing.source.as_str(),
    });
    audit_ops::append(
        conn,
        AuditAction::ReportDeleted,
        actor_id,
        Some(id),
        &details,
    )?;

    conn.execute("DELETE FROM reports WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Parse a row from the reports table into a Report.
pub(crate) fn row_to_report(row: &rusqlite::Row<'_>) -> SafespaceResult<Report> {
    let source_str: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let status_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let severity_str: Option<String> = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let categories_json: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let created_str: String = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;

    let source = ReportSource::parse(&source_str)
        .ok_or_else(|| to_storage_err(format!("unknown report source '{source_str}'")))?;
    let status = ReportStatus::parse(&status_str)
        .ok_or_else(|| to_storage_err(format!("unknown report status '{status_str}'")))?;
    let severity = severity_str
        .as_deref()
        .map(|s| {
            ReportSeverity::parse(s)
                .ok_or_else(|| to_storage_err(format!("unknown report severity '{s}'")))
        })
        .transpose()?;
    let categories: Vec<String> = serde_json::from_str(&categories_json)
        .map_err(|e| to_storage_err(format!("parse categories: {e}")))?;
    let metadata: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&metadata_json)
            .map_err(|e| to_storage_err(format!("parse metadata: {e}")))?;

    Ok(Report {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        encrypted_payload: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        channel_id: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        source,
        status,
        severity,
        categories,
        metadata,
        created_at: parse_datetime(&created_str)?,
        updated_at: parse_datetime(&updated_str)?,
        reviewed_by: row.get(10).map_err(|e| to_storage_err(e.to_string()))?,
        review_notes: row.get(11).map_err(|e| to_storage_err(e.to_string()))?,
    })
}

pub(crate) fn parse_datetime(s: &str) -> SafespaceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}
