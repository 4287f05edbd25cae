//! Dashboard and analytics endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use safespace_analytics::DashboardStats;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.aggregator.dashboard_stats()?))
}

/// Everything the analytics page needs in one call.
pub async fn overview(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let stats = state.aggregator.dashboard_stats()?;
    let categories = state.aggregator.category_distribution()?;
    let severities = state.aggregator.severity_distribution()?;
    let trends = state.aggregator.trends(30)?;

    Ok(Json(json!({
        "stats": stats,
        "category_distribution": categories,
        "severity_distribution": severities,
        "trends": trends,
    })))
}
