//! Report entity, its status state machine, and the patch/filter shapes
//! used by the store. The store exclusively owns mutation; callers hand it
//! a [`ReportPatch`] and never touch fields directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a report entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    Slack,
    Web,
    Email,
    Phone,
}

impl ReportSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportSource::Slack => "slack",
            ReportSource::Web => "web",
            ReportSource::Email => "email",
            ReportSource::Phone => "phone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "slack" => Some(ReportSource::Slack),
            "web" => Some(ReportSource::Web),
            "email" => Some(ReportSource::Email),
            "phone" => Some(ReportSource::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review lifecycle state. Transitions move forward or sideways only;
/// once a report leaves `Pending` it can never return (once triaged,
/// always triaged).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    UnderReview,
    Resolved,
    Escalated,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::UnderReview => "under_review",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Escalated => "escalated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "under_review" => Some(ReportStatus::UnderReview),
            "resolved" => Some(ReportStatus::Resolved),
            "escalated" => Some(ReportStatus::Escalated),
            _ => None,
        }
    }

    /// Whether `self -> next` is a legal transition. Same-state is a no-op
    /// and always allowed.
    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        if self == next {
            return true;
        }
        match self {
            ReportStatus::Pending => true,
            ReportStatus::UnderReview => {
                matches!(next, ReportStatus::Resolved | ReportStatus::Escalated)
            }
            ReportStatus::Resolved => matches!(next, ReportStatus::Escalated),
            ReportStatus::Escalated => matches!(next, ReportStatus::Resolved),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage severity of a report. Unlike detection severity, reports can be
/// marked critical by a reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportSeverity::Low => "low",
            ReportSeverity::Medium => "medium",
            ReportSeverity::High => "high",
            ReportSeverity::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(ReportSeverity::Low),
            "medium" => Some(ReportSeverity::Medium),
            "high" => Some(ReportSeverity::High),
            "critical" => Some(ReportSeverity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An anonymous incident report. The payload is opaque ciphertext; the
/// server only ever holds plaintext transiently during decrypt-for-display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub encrypted_payload: String,
    /// Pseudonymous follow-up handle, not a real identity.
    pub channel_id: String,
    pub source: ReportSource,
    pub status: ReportStatus,
    /// Null until triaged.
    pub severity: Option<ReportSeverity>,
    pub categories: Vec<String>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

/// Input for report creation. Id, timestamps, and default status are
/// stamped by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub encrypted_payload: String,
    pub channel_id: String,
    pub source: ReportSource,
    #[serde(default)]
    pub severity: Option<ReportSeverity>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Partial update: only present fields are applied, omitted fields stay
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPatch {
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(default)]
    pub severity: Option<ReportSeverity>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

impl ReportPatch {
    /// A patch with nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.severity.is_none()
            && self.reviewed_by.is_none()
            && self.review_notes.is_none()
    }
}

/// Conjunctive listing filters with offset/limit pagination.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
    pub source: Option<ReportSource>,
    /// Only reports created within the last N days.
    pub days: Option<u64>,
    pub skip: usize,
    /// Clamped to [`crate::constants::MAX_LIST_LIMIT`] by the store.
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_reaches_resolved_directly() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Resolved));
    }

    #[test]
    fn nothing_returns_to_pending() {
        for from in [
            ReportStatus::UnderReview,
            ReportStatus::Resolved,
            ReportStatus::Escalated,
        ] {
            assert!(!from.can_transition_to(ReportStatus::Pending), "{from}");
        }
    }

    #[test]
    fn escalated_can_resolve() {
        assert!(ReportStatus::Escalated.can_transition_to(ReportStatus::Resolved));
        assert!(!ReportStatus::Escalated.can_transition_to(ReportStatus::UnderReview));
    }

    #[test]
    fn resolved_reopens_only_via_escalation() {
        assert!(ReportStatus::Resolved.can_transition_to(ReportStatus::Escalated));
        assert!(!ReportStatus::Resolved.can_transition_to(ReportStatus::UnderReview));
    }

    #[test]
    fn same_state_is_noop() {
        for s in [
            ReportStatus::Pending,
            ReportStatus::UnderReview,
            ReportStatus::Resolved,
            ReportStatus::Escalated,
        ] {
            assert!(s.can_transition_to(s));
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [
            ReportStatus::Pending,
            ReportStatus::UnderReview,
            ReportStatus::Resolved,
            ReportStatus::Escalated,
        ] {
            assert_eq!(ReportStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ReportStatus::parse("reviewed"), None);
    }
}
