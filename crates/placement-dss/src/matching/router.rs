use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{InternshipId, InternshipProfile, StudentId, StudentProfile};
use super::error::DssError;
use super::service::{MatchService, MatchServiceError};
use super::store::{ScoreStore, StoreError};
use super::weights::Weight;

/// Payload for ranking internships on behalf of a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternshipMatchRequest {
    pub student: StudentProfile,
    pub internships: Vec<InternshipProfile>,
    pub weights: Vec<Weight>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Payload for ranking applicants on behalf of a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentMatchRequest {
    pub internship: InternshipProfile,
    pub students: Vec<StudentProfile>,
    pub weights: Vec<Weight>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Router builder exposing the DSS matching endpoints.
pub fn match_router<S>(service: Arc<MatchService<S>>) -> Router
where
    S: ScoreStore + 'static,
{
    Router::new()
        .route("/api/v1/dss/match", post(match_internships_handler::<S>))
        .route(
            "/api/v1/dss/match/students",
            post(match_students_handler::<S>),
        )
        .route(
            "/api/v1/dss/scores/:student_id/:internship_id",
            get(latest_score_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn match_internships_handler<S>(
    State(service): State<Arc<MatchService<S>>>,
    axum::Json(request): axum::Json<InternshipMatchRequest>,
) -> Response
where
    S: ScoreStore + 'static,
{
    match service.match_internships(
        &request.student,
        &request.internships,
        &request.weights,
        request.top_k,
    ) {
        Ok(matches) => (StatusCode::OK, axum::Json(matches)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn match_students_handler<S>(
    State(service): State<Arc<MatchService<S>>>,
    axum::Json(request): axum::Json<StudentMatchRequest>,
) -> Response
where
    S: ScoreStore + 'static,
{
    match service.match_students(
        &request.internship,
        &request.students,
        &request.weights,
        request.top_k,
    ) {
        Ok(matches) => (StatusCode::OK, axum::Json(matches)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn latest_score_handler<S>(
    State(service): State<Arc<MatchService<S>>>,
    Path((student_id, internship_id)): Path<(u64, u64)>,
) -> Response
where
    S: ScoreStore + 'static,
{
    match service.latest(StudentId(student_id), InternshipId(internship_id)) {
        Ok(Some(score)) => (StatusCode::OK, axum::Json(score)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "no score recorded for pair",
                "student_id": student_id,
                "internship_id": internship_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

/// HTTP status for a service failure: caller mistakes are 422, engine defects 500.
pub fn status_for(error: &MatchServiceError) -> StatusCode {
    match error {
        MatchServiceError::Dss(dss) if dss.is_caller_error() => StatusCode::UNPROCESSABLE_ENTITY,
        MatchServiceError::Dss(_) => StatusCode::INTERNAL_SERVER_ERROR,
        MatchServiceError::Store(source) | MatchServiceError::Persist { source, .. } => {
            match source {
                StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }
}

fn error_kind(error: &MatchServiceError) -> &'static str {
    match error {
        MatchServiceError::Dss(dss) => dss.kind(),
        MatchServiceError::Store(_) => "store",
        MatchServiceError::Persist { .. } => "partial_persist",
    }
}

fn error_response(error: MatchServiceError) -> Response {
    if let MatchServiceError::Dss(DssError::CriterionRange { criterion, value }) = &error {
        tracing::error!(%criterion, value, "criterion produced an out-of-range sub-score");
    }

    let mut payload = json!({
        "error": error.to_string(),
        "kind": error_kind(&error),
    });
    if let MatchServiceError::Persist { saved, .. } = &error {
        payload["persisted"] = json!(saved);
    }
    (status_for(&error), axum::Json(payload)).into_response()
}
