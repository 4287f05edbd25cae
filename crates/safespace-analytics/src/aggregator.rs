//! SQL rollups for the review dashboard.

use std::sync::Arc;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use safespace_core::errors::SafespaceResult;
use safespace_storage::ReportStore;

/// Headline numbers for the dashboard landing view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_reports: u64,
    pub pending_reports: u64,
    /// High plus critical severity.
    pub high_priority_reports: u64,
    pub reports_this_week: u64,
    /// Percentage of reports that have left `pending`, 0.0 when empty.
    pub resolution_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCount {
    pub severity: String,
    pub count: u64,
}

/// Reports created on one calendar day (UTC).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

/// Read-only aggregation facade over the store.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<ReportStore>,
}

impl Aggregator {
    pub fn new(store: Arc<ReportStore>) -> Self {
        Self { store }
    }

    /// Headline stats. All counts run on the same read connection.
    pub fn dashboard_stats(&self) -> SafespaceResult<DashboardStats> {
        self.store.read(|conn| {
            let total = count_where(conn, "1=1")?;
            let pending = count_where(conn, "status = 'pending'")?;
            let high_priority = count_where(conn, "severity IN ('high', 'critical')")?;
            let this_week =
                count_where(conn, "julianday('now') - julianday(created_at) <= 7")?;

            let resolution_rate = if total == 0 {
                0.0
            } else {
                (total - pending) as f64 / total as f64 * 100.0
            };

            Ok(DashboardStats {
                total_reports: total,
                pending_reports: pending,
                high_priority_reports: high_priority,
                reports_this_week: this_week,
                resolution_rate,
            })
        })
    }

    /// How often each detection category appears across all reports.
    /// Categories are stored as a JSON array per report; `json_each`
    /// unnests them so one report can count toward several categories.
    pub fn category_distribution(&self) -> SafespaceResult<Vec<CategoryCount>> {
        self.store.read(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT je.value, COUNT(*) AS n
                     FROM reports, json_each(reports.categories) AS je
                     GROUP BY je.value
                     ORDER BY n DESC, je.value ASC",
                )
                .map_err(sql_err)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(CategoryCount {
                        category: row.get(0)?,
                        count: row.get::<_, i64>(1)? as u64,
                    })
                })
                .map_err(sql_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
        })
    }

    /// Report counts per severity tier; untriaged reports bucket under
    /// `"untriaged"`.
    pub fn severity_distribution(&self) -> SafespaceResult<Vec<SeverityCount>> {
        self.store.read(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT COALESCE(severity, 'untriaged') AS tier, COUNT(*) AS n
                     FROM reports
                     GROUP BY tier
                     ORDER BY n DESC, tier ASC",
                )
                .map_err(sql_err)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(SeverityCount {
                        severity: row.get(0)?,
                        count: row.get::<_, i64>(1)? as u64,
                    })
                })
                .map_err(sql_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
        })
    }

    /// Per-day report counts for the last `days` days. Days with no
    /// reports are absent from the result.
    pub fn trends(&self, days: u64) -> SafespaceResult<Vec<DailyCount>> {
        self.store.read(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT date(created_at) AS day, COUNT(*) AS n
                     FROM reports
                     WHERE julianday('now') - julianday(created_at) <= ?1
                     GROUP BY day
                     ORDER BY day ASC",
                )
                .map_err(sql_err)?;
            let rows = stmt
                .query_map(params![days.min(i64::MAX as u64) as i64], |row| {
                    Ok(DailyCount {
                        date: row.get(0)?,
                        count: row.get::<_, i64>(1)? as u64,
                    })
                })
                .map_err(sql_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
        })
    }
}

fn count_where(conn: &Connection, clause: &str) -> SafespaceResult<u64> {
    let n: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM reports WHERE {clause}"), [], |row| {
            row.get(0)
        })
        .map_err(sql_err)?;
    Ok(n as u64)
}

fn sql_err(e: rusqlite::Error) -> safespace_core::SafespaceError {
    safespace_core::SafespaceError::Storage(safespace_core::errors::StorageError::SqliteError {
        message: e.to_string(),
    })
}
