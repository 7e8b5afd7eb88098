use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AssessmentId, AssessmentSubmission};
use super::repository::{AssessmentRepository, EscalationPublisher, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing HTTP endpoints for intake and computation.
pub fn assessment_router<R, E>(service: Arc<AssessmentService<R, E>>) -> Router
where
    R: AssessmentRepository + 'static,
    E: EscalationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<R, E>))
        .route(
            "/api/v1/assessments/:assessment_id/compute",
            post(compute_handler::<R, E>),
        )
        .route(
            "/api/v1/assessments/:assessment_id",
            get(status_handler::<R, E>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, E>(
    State(service): State<Arc<AssessmentService<R, E>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    E: EscalationPublisher + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(AssessmentServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "assessment already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn compute_handler<R, E>(
    State(service): State<Arc<AssessmentService<R, E>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    E: EscalationPublisher + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.compute(&id) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "assessment not found",
                "assessment_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, E>(
    State(service): State<Arc<AssessmentService<R, E>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    E: EscalationPublisher + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "assessment not found",
                "assessment_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
