//! Audit trail types. Entries are immutable once written; the storage
//! layer exposes append and read operations only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a state-changing action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    ReportCreated,
    ReportUpdated,
    ReportDeleted,
    ConfigChanged,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::ReportCreated => "report_created",
            AuditAction::ReportUpdated => "report_updated",
            AuditAction::ReportDeleted => "report_deleted",
            AuditAction::ConfigChanged => "config_changed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "report_created" => Some(AuditAction::ReportCreated),
            "report_updated" => Some(AuditAction::ReportUpdated),
            "report_deleted" => Some(AuditAction::ReportDeleted),
            "config_changed" => Some(AuditAction::ConfigChanged),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub action: AuditAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
