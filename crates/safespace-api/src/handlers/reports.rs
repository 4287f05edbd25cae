//! Report lifecycle endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use safespace_core::audit::AuditEntry;
use safespace_core::report::{
    NewReport, Report, ReportFilter, ReportPatch, ReportSeverity, ReportSource, ReportStatus,
};
use safespace_core::SafespaceError;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::tasks;

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    /// Client-encrypted token; the server stores it opaque.
    pub encrypted_blob: String,
    pub channel_id: String,
    pub source: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

pub async fn create_report(
    State(state): State<AppState>,
    Json(body): Json<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    let source = parse_source(&body.source)?;

    let report = state.store.create(
        NewReport {
            encrypted_payload: body.encrypted_blob,
            channel_id: body.channel_id,
            source,
            severity: None,
            categories: body.categories,
            metadata: body.metadata,
        },
        Some("intake"),
    )?;

    tracing::info!(report_id = %report.id, source = %report.source, "report received");
    tasks::spawn_severity_analysis(state.clone(), report.id.clone());

    Ok((StatusCode::CREATED, Json(report)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListReportsQuery {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub source: Option<String>,
    pub days: Option<u64>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: usize,
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> ApiResult<Json<Vec<Report>>> {
    let filter = ReportFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        severity: query.severity.as_deref().map(parse_severity).transpose()?,
        source: query.source.as_deref().map(parse_source).transpose()?,
        days: query.days,
        skip: query.skip,
        limit: query.limit,
    };
    Ok(Json(state.store.list(&filter)?))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Report>> {
    Ok(Json(state.store.get(&id)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewerQuery {
    pub reviewer_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateReportRequest {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub reviewed_by: Option<String>,
    pub review_notes: Option<String>,
}

pub async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReviewerQuery>,
    Json(body): Json<UpdateReportRequest>,
) -> ApiResult<Json<Report>> {
    let patch = ReportPatch {
        status: body.status.as_deref().map(parse_status).transpose()?,
        severity: body.severity.as_deref().map(parse_severity).transpose()?,
        // The acting reviewer is recorded on the report unless the body
        // names someone else explicitly.
        reviewed_by: body.reviewed_by.or_else(|| query.reviewer_id.clone()),
        review_notes: body.review_notes,
    };
    let report = state
        .store
        .update(&id, &patch, query.reviewer_id.as_deref())?;
    Ok(Json(report))
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub admin_id: Option<String>,
}

pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AdminQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete(&id, query.admin_id.as_deref())?;
    Ok(Json(json!({ "message": format!("report {id} deleted") })))
}

pub async fn report_audit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<AuditEntry>>> {
    // 404 for unknown ids rather than an empty trail.
    state.store.get(&id)?;
    Ok(Json(state.store.audit_for_report(&id)?))
}

fn parse_source(s: &str) -> Result<ReportSource, SafespaceError> {
    ReportSource::parse(s)
        .ok_or_else(|| SafespaceError::validation(format!("unknown report source '{s}'")))
}

fn parse_status(s: &str) -> Result<ReportStatus, SafespaceError> {
    ReportStatus::parse(s)
        .ok_or_else(|| SafespaceError::validation(format!("unknown report status '{s}'")))
}

fn parse_severity(s: &str) -> Result<ReportSeverity, SafespaceError> {
    ReportSeverity::parse(s)
        .ok_or_else(|| SafespaceError::validation(format!("unknown report severity '{s}'")))
}
