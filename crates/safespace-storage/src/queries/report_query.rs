//! Filtered listing over the reports table.

use rusqlite::{Connection, ToSql};

use safespace_core::constants::MAX_LIST_LIMIT;
use safespace_core::errors::SafespaceResult;
use safespace_core::report::{Report, ReportFilter};

use super::report_crud::{row_to_report, REPORT_COLUMNS};
use crate::to_storage_err;

/// List reports matching every present filter, newest first.
///
/// `days` keeps reports created within the last N days. `limit` is
/// clamped to [`MAX_LIST_LIMIT`]; a zero limit falls back to the cap.
pub fn list_reports(conn: &Connection, filter: &ReportFilter) -> SafespaceResult<Vec<Report>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(status) = filter.status {
        params.push(Box::new(status.as_str()));
        clauses.push(format!("status = ?{}", params.len()));
    }
    if let Some(severity) = filter.severity {
        params.push(Box::new(severity.as_str()));
        clauses.push(format!("severity = ?{}", params.len()));
    }
    if let Some(source) = filter.source {
        params.push(Box::new(source.as_str()));
        clauses.push(format!("source = ?{}", params.len()));
    }
    if let Some(days) = filter.days {
        // A days value past i64::MAX would wrap negative and match nothing.
        params.push(Box::new(days.min(i64::MAX as u64) as i64));
        clauses.push(format!(
            "julianday('now') - julianday(created_at) <= ?{}",
            params.len()
        ));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let limit = if filter.limit == 0 {
        MAX_LIST_LIMIT
    } else {
        filter.limit.min(MAX_LIST_LIMIT)
    };
    params.push(Box::new(limit as i64));
    let limit_idx = params.len();
    params.push(Box::new(filter.skip as i64));
    let offset_idx = params.len();

    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports {where_clause}
         ORDER BY created_at DESC, id DESC
         LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| Ok(row_to_report(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(reports)
}

/// Total number of stored reports.
pub fn count_reports(conn: &Connection) -> SafespaceResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}
