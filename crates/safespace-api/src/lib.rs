//! # safespace-api
//!
//! HTTP surface for report intake, content detection, and the review
//! dashboard. Routes live under `/api/v1`; handlers share an [`AppState`]
//! holding the store, classifier, cipher, and aggregator.

pub mod error;
pub mod handlers;
pub mod state;
pub mod tasks;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::welcome))
        .route("/health", get(handlers::health::health))
        .route("/api/v1/reports", post(handlers::reports::create_report))
        .route("/api/v1/reports", get(handlers::reports::list_reports))
        .route(
            "/api/v1/reports/stats/dashboard",
            get(handlers::analytics::dashboard),
        )
        .route("/api/v1/reports/{id}", get(handlers::reports::get_report))
        .route(
            "/api/v1/reports/{id}",
            patch(handlers::reports::update_report),
        )
        .route(
            "/api/v1/reports/{id}",
            delete(handlers::reports::delete_report),
        )
        .route(
            "/api/v1/reports/{id}/audit",
            get(handlers::reports::report_audit),
        )
        .route(
            "/api/v1/analytics/overview",
            get(handlers::analytics::overview),
        )
        .route("/api/v1/detect", post(handlers::detection::detect))
        .route(
            "/api/v1/detect/health",
            get(handlers::detection::detect_health),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "safespace API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
