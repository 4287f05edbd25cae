//! Content detection endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use safespace_core::detection::{
    Category, CategoryScores, ChannelType, DetectionSeverity,
};
use safespace_detection::recommendations;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::tasks;

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub text: String,
    pub user_id: Option<String>,
    /// Lenient: unrecognized values analyze as `unknown`.
    pub channel_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub flagged: bool,
    pub confidence: f64,
    pub scores: CategoryScores,
    pub categories: Vec<Category>,
    pub severity: DetectionSeverity,
    pub recommendations: Vec<String>,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Analyze a message. Total: degraded results carry an `error` field,
/// never a 500.
pub async fn detect(
    State(state): State<AppState>,
    Json(body): Json<DetectRequest>,
) -> ApiResult<Json<DetectResponse>> {
    let channel = ChannelType::parse(body.channel_type.as_deref().unwrap_or("unknown"));
    let result = state
        .classifier
        .analyze(&body.text, body.user_id.as_deref(), channel);

    if result.flagged && result.severity == DetectionSeverity::High {
        tasks::spawn_high_severity_log(result.clone(), body.user_id.clone());
    }

    let recommendations = recommendations::for_result(&result);
    Ok(Json(DetectResponse {
        flagged: result.flagged,
        confidence: result.confidence,
        scores: result.scores,
        categories: result.categories,
        severity: result.severity,
        recommendations,
        from_cache: result.from_cache,
        error: result.error,
    }))
}

/// Self-test: run a benign probe through the full pipeline and report
/// whether the classifier is serving degraded.
pub async fn detect_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let probe = state
        .classifier
        .analyze("routine system health probe", None, ChannelType::Unknown);

    let healthy = probe.error.is_none();
    Json(json!({
        "status": if healthy { "ok" } else { "degraded" },
        "model_loaded": state.classifier.model_loaded(),
        "probe_flagged": probe.flagged,
        "probe_error": probe.error,
    }))
}
