use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::catalog::QuestionCatalog;
use super::domain::{AssessmentId, NewAssessment, OrganizationId, UserId};
use super::ingest::AnswerSubmission;
use super::recommendations::RecommendationQuery;
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing the assessment session, scoring and analytics endpoints.
pub fn assessment_router<R, C>(service: Arc<AssessmentService<R, C>>) -> Router
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(start_handler::<R, C>))
        .route(
            "/api/v1/assessments/:assessment_id/next-question",
            get(next_question_handler::<R, C>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/answers",
            post(answer_handler::<R, C>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/complete",
            post(complete_handler::<R, C>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/abandon",
            post(abandon_handler::<R, C>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/scores",
            get(scores_handler::<R, C>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/recommendations",
            get(recommendations_handler::<R, C>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/peer-comparison",
            get(peer_comparison_handler::<R, C>),
        )
        .route(
            "/api/v1/analytics/users/:user_id",
            get(user_analytics_handler::<R, C>),
        )
        .route(
            "/api/v1/analytics/organizations/:organization_id",
            get(organization_analytics_handler::<R, C>),
        )
        .route(
            "/api/v1/analytics/industries/:industry",
            get(industry_analytics_handler::<R, C>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    axum::Json(request): axum::Json<NewAssessment>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    match service.start_assessment(request) {
        Ok(assessment) => (StatusCode::CREATED, axum::Json(assessment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn next_question_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.next_question(&AssessmentId(assessment_id)))
}

pub(crate) async fn answer_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<String>,
    axum::Json(submission): axum::Json<AnswerSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.submit_answer(&AssessmentId(assessment_id), submission))
}

pub(crate) async fn complete_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.complete(&AssessmentId(assessment_id)))
}

pub(crate) async fn abandon_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.abandon(&AssessmentId(assessment_id)))
}

pub(crate) async fn scores_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.scores(&AssessmentId(assessment_id)))
}

pub(crate) async fn recommendations_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.recommendations(&AssessmentId(assessment_id), &query))
}

pub(crate) async fn peer_comparison_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.peer_comparison(&AssessmentId(assessment_id)))
}

pub(crate) async fn user_analytics_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.individual_analytics(&UserId(user_id)))
}

pub(crate) async fn organization_analytics_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(organization_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.organization_analytics(&OrganizationId(organization_id)))
}

pub(crate) async fn industry_analytics_handler<R, C>(
    State(service): State<Arc<AssessmentService<R, C>>>,
    Path(industry): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    C: QuestionCatalog + 'static,
{
    respond(service.industry_analytics(&industry))
}

fn respond<T: Serialize>(result: Result<T, AssessmentServiceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::Conflict(_)
        | AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::NotFound(_)
        | AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Computation(_)
        | AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
