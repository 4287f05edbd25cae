//! Fire-and-forget background tasks. Failures are logged, never surfaced
//! to the request that spawned them.

use safespace_core::detection::{ChannelType, DetectionResult, DetectionSeverity};
use safespace_core::report::{ReportPatch, ReportSeverity};
use safespace_core::SafespaceResult;

use crate::state::AppState;

pub const SEVERITY_ANALYSIS_ACTOR: &str = "system:severity-analysis";

/// Decrypt a freshly created report, classify its content, and write the
/// resulting severity back as a triage hint for reviewers.
pub fn spawn_severity_analysis(state: AppState, report_id: String) {
    tokio::spawn(async move {
        if let Err(e) = run_severity_analysis(&state, &report_id) {
            tracing::warn!(report_id = %report_id, error = %e, "severity analysis failed");
        }
    });
}

fn run_severity_analysis(state: &AppState, report_id: &str) -> SafespaceResult<()> {
    let report = state.store.get(report_id)?;
    if report.severity.is_some() {
        return Ok(());
    }

    // Reports encrypted with a key this server does not hold stay
    // untriaged; that is expected, not an error.
    let plaintext = match state.cipher.decrypt(&report.encrypted_payload) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!(report_id, "decrypted payload is not utf-8, skipping triage");
                return Ok(());
            }
        },
        Err(e) => {
            tracing::info!(report_id, error = %e, "payload not decryptable, leaving untriaged");
            return Ok(());
        }
    };

    let result = state
        .classifier
        .analyze(&plaintext, None, ChannelType::Unknown);

    let severity = report_severity_for(&result);
    let patch = ReportPatch {
        severity: Some(severity),
        ..Default::default()
    };
    state
        .store
        .update(report_id, &patch, Some(SEVERITY_ANALYSIS_ACTOR))?;
    tracing::info!(
        report_id,
        severity = severity.as_str(),
        confidence = result.confidence,
        "severity analysis triaged report"
    );
    Ok(())
}

/// Map a detection result onto the report triage scale. Very confident
/// high-severity detections escalate to critical.
pub fn report_severity_for(result: &DetectionResult) -> ReportSeverity {
    match result.severity {
        DetectionSeverity::High if result.confidence > 0.9 => ReportSeverity::Critical,
        DetectionSeverity::High => ReportSeverity::High,
        DetectionSeverity::Medium => ReportSeverity::Medium,
        DetectionSeverity::Low => ReportSeverity::Low,
    }
}

/// Record a high-severity flagged detection off the request path.
pub fn spawn_high_severity_log(result: DetectionResult, user_id: Option<String>) {
    tokio::spawn(async move {
        tracing::warn!(
            text_hash = %result.text_hash,
            confidence = result.confidence,
            categories = ?result.categories,
            channel = result.channel_type.as_str(),
            user_present = user_id.is_some(),
            "high severity content detected"
        );
    });
}
