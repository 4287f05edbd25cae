//! The report store: the one type the rest of the workspace talks to.
//!
//! Mutations go through the single writer so every state change and its
//! audit entry commit together. Reads fan out over the pool's read
//! connections, except in in-memory mode where the pool has none and
//! reads fall through to the writer.

use std::path::Path;

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use safespace_core::audit::AuditEntry;
use safespace_core::config::RetentionConfig;
use safespace_core::errors::{SafespaceError, SafespaceResult};
use safespace_core::report::{NewReport, Report, ReportFilter, ReportPatch, ReportStatus};

use crate::migrations::run_migrations;
use crate::pool::ConnectionPool;
use crate::queries::{audit_ops, config_ops, maintenance, report_crud, report_query};

pub use crate::queries::maintenance::PurgeOutcome;

pub struct ReportStore {
    pool: ConnectionPool,
}

impl ReportStore {
    /// Open a store backed by the given database file and run migrations.
    pub fn open(path: &Path) -> SafespaceResult<Self> {
        let pool = ConnectionPool::open(path)?;
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing). All reads go through the
    /// writer since the pool opens no in-memory readers.
    pub fn open_in_memory() -> SafespaceResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> SafespaceResult<()> {
        self.pool.writer.with_conn_sync(run_migrations)
    }

    /// Run a read-only closure on the appropriate connection.
    pub fn read<F, T>(&self, f: F) -> SafespaceResult<T>
    where
        F: FnOnce(&Connection) -> SafespaceResult<T>,
    {
        self.pool.with_read_conn(f)
    }

    // ── Report lifecycle ────────────────────────────────────────────────

    /// Persist a new report. The store stamps the id, both timestamps,
    /// and the initial `pending` status.
    pub fn create(&self, new: NewReport, actor_id: Option<&str>) -> SafespaceResult<Report> {
        if new.encrypted_payload.trim().is_empty() {
            return Err(SafespaceError::validation("encrypted_payload is required"));
        }
        if new.channel_id.trim().is_empty() {
            return Err(SafespaceError::validation("channel_id is required"));
        }

        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4().to_string(),
            encrypted_payload: new.encrypted_payload,
            channel_id: new.channel_id,
            source: new.source,
            status: ReportStatus::Pending,
            severity: new.severity,
            categories: new.categories,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
            reviewed_by: None,
            review_notes: None,
        };

        self.pool
            .writer
            .with_conn_sync(|conn| report_crud::create_report(conn, &report, actor_id))?;
        Ok(report)
    }

    /// Fetch a report by id, erroring when it does not exist.
    pub fn get(&self, id: &str) -> SafespaceResult<Report> {
        self.read(|conn| report_crud::get_report(conn, id))?
            .ok_or_else(|| SafespaceError::ReportNotFound { id: id.to_string() })
    }

    /// Apply a partial update. Status transitions are validated against the
    /// lifecycle state machine before anything is written.
    pub fn update(
        &self,
        id: &str,
        patch: &ReportPatch,
        actor_id: Option<&str>,
    ) -> SafespaceResult<Report> {
        if patch.is_empty() {
            return self.get(id);
        }
        self.pool
            .writer
            .with_conn_sync(|conn| report_crud::update_report(conn, id, patch, actor_id))
    }

    /// Remove a report. The deletion itself is recorded in the audit trail.
    pub fn delete(&self, id: &str, actor_id: Option<&str>) -> SafespaceResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| report_crud::delete_report(conn, id, actor_id))
    }

    /// List reports matching the filter, newest first.
    pub fn list(&self, filter: &ReportFilter) -> SafespaceResult<Vec<Report>> {
        self.read(|conn| report_query::list_reports(conn, filter))
    }

    pub fn count(&self) -> SafespaceResult<u64> {
        self.read(report_query::count_reports)
    }

    // ── Audit trail ─────────────────────────────────────────────────────

    /// Full audit history for one report, oldest first.
    pub fn audit_for_report(&self, report_id: &str) -> SafespaceResult<Vec<AuditEntry>> {
        self.read(|conn| audit_ops::for_report(conn, report_id))
    }

    /// Most recent audit entries across all reports, newest first.
    pub fn recent_audit(&self, limit: usize) -> SafespaceResult<Vec<AuditEntry>> {
        self.read(|conn| audit_ops::recent(conn, limit))
    }

    pub fn audit_count(&self) -> SafespaceResult<usize> {
        self.read(audit_ops::count)
    }

    // ── System configuration ────────────────────────────────────────────

    pub fn get_config(&self, key: &str) -> SafespaceResult<Option<String>> {
        self.read(|conn| config_ops::get_config(conn, key))
    }

    pub fn set_config(&self, key: &str, value: &str, actor_id: Option<&str>) -> SafespaceResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| config_ops::set_config(conn, key, value, actor_id))
    }

    pub fn retention_config(&self) -> SafespaceResult<RetentionConfig> {
        self.read(config_ops::retention_config)
    }

    // ── Maintenance ─────────────────────────────────────────────────────

    /// Delete rows past their retention windows.
    pub fn purge_expired(&self) -> SafespaceResult<PurgeOutcome> {
        let retention = self.retention_config()?;
        let outcome = self
            .pool
            .writer
            .with_conn_sync(|conn| maintenance::purge_expired(conn, &retention))?;
        if outcome.reports_purged > 0 || outcome.audit_entries_purged > 0 {
            tracing::info!(
                reports = outcome.reports_purged,
                audit_entries = outcome.audit_entries_purged,
                "retention purge removed expired rows"
            );
        }
        Ok(outcome)
    }

    /// Rebuild the database file to reclaim space.
    pub fn vacuum(&self) -> SafespaceResult<()> {
        self.pool.writer.with_conn_sync(maintenance::full_vacuum)
    }
}
