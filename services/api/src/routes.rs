use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use placement_dss::matching::{match_router, MatchService, ScoreStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_match_routes<S>(service: Arc<MatchService<S>>) -> axum::Router
where
    S: ScoreStore + 'static,
{
    let criteria: Vec<String> = service
        .criteria()
        .into_iter()
        .map(str::to_string)
        .collect();

    match_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/dss/criteria",
            get(move || criteria_endpoint(criteria.clone())),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn criteria_endpoint(criteria: Vec<String>) -> Json<serde_json::Value> {
    Json(json!({ "criteria": criteria }))
}
