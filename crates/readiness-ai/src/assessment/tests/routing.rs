use super::common::*;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessment::catalog::QuestionBank;
use crate::assessment::config::EngineConfig;
use crate::assessment::domain::{AssessmentType, DimensionScores};
use crate::assessment::recommendations::{Priority, RecommendationQuery};
use crate::assessment::router;
use crate::assessment::service::AssessmentService;

fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}

fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn start_route_creates_assessments() {
    let (service, _) = build_service();
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/assessments",
            json!({ "user_id": "u-http", "assessment_type": "quick", "industry": "saas" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "in_progress");
    assert_eq!(payload["assessment_type"], "quick");
    assert!(payload["id"].as_str().expect("id").starts_with("asm-"));
}

#[tokio::test]
async fn answer_route_returns_scores_and_the_next_question() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let assessment = service
        .start_assessment(new_assessment("u-http", None, None, AssessmentType::Quick))
        .expect("assessment starts");
    let router = router::assessment_router(service.clone());

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/assessments/{}/answers", assessment.id),
            json!({ "question_code": "IND_001", "value": 80, "time_spent_seconds": 12 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["scores"]["individual"], 80);
    assert_eq!(payload["overall_score"], 16);
    assert_eq!(payload["complete"], false);
    assert_eq!(payload["next_question"]["code"], "LEAD_001");
    assert_eq!(payload["progress"]["answered"], 1);
}

#[tokio::test]
async fn next_question_handler_reports_missing_assessments() {
    let (service, _) = build_service();
    let response = router::next_question_handler::<MemoryRepository, QuestionBank>(
        State(Arc::new(service)),
        Path("asm-unknown".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "assessment asm-unknown not found");
}

#[tokio::test]
async fn answer_handler_rejects_completed_assessments() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let assessment = service
        .start_assessment(new_assessment("u-http", None, None, AssessmentType::Quick))
        .expect("assessment starts");
    service.complete(&assessment.id).expect("completes");

    let response = router::answer_handler::<MemoryRepository, QuestionBank>(
        State(service),
        Path(assessment.id.0.clone()),
        axum::Json(submission("IND_001", 50.0)),
    )
    .await;

    assert_conflict_response(response);
}

#[tokio::test]
async fn answer_handler_returns_unprocessable_for_bad_values() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let assessment = service
        .start_assessment(new_assessment("u-http", None, None, AssessmentType::Full))
        .expect("assessment starts");

    let response = router::answer_handler::<MemoryRepository, QuestionBank>(
        State(service),
        Path(assessment.id.0.clone()),
        axum::Json(submission("LEAD_003", 101.0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn repository_outages_are_internal_errors() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(UnavailableRepository),
        Arc::new(QuestionBank::standard()),
        EngineConfig::standard(),
    ));

    let response = router::scores_handler::<UnavailableRepository, QuestionBank>(
        State(service),
        Path("asm-000001".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn recommendations_route_applies_query_filters() {
    let (service, repository) = build_service();
    repository.seed_completed(scored(
        "asm-http-rec",
        "u-http",
        None,
        None,
        scores([30, 10, 25, 85, 5]),
        at(2024, 6, 1),
    ));
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(get(
            "/api/v1/assessments/asm-http-rec/recommendations?priority=critical&limit=1",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let quick_wins = payload["quick_wins"].as_array().expect("array");
    assert_eq!(quick_wins.len(), 1);
    assert_eq!(quick_wins[0]["dimension"], "leadership");
    assert_eq!(quick_wins[0]["priority"], "critical");
}

#[tokio::test]
async fn recommendations_handler_conflicts_for_in_progress_assessments() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let assessment = service
        .start_assessment(new_assessment("u-http", None, None, AssessmentType::Full))
        .expect("assessment starts");

    let response = router::recommendations_handler::<MemoryRepository, QuestionBank>(
        State(service),
        Path(assessment.id.0.clone()),
        Query(RecommendationQuery {
            priority: Some(Priority::High),
            ..RecommendationQuery::default()
        }),
    )
    .await;

    assert_conflict_response(response);
}

#[tokio::test]
async fn organization_analytics_route_handles_empty_history() {
    let (service, _) = build_service();
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/analytics/organizations/org-none"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["organization_id"], "org-none");
    assert_eq!(payload["total_assessments"], 0);
    assert_eq!(payload["trends"], json!([]));
    assert_eq!(
        payload["maturity_distribution"]
            .as_array()
            .expect("array")
            .len(),
        5
    );
}

#[tokio::test]
async fn industry_analytics_route_reports_the_envelope() {
    let (service, repository) = build_service();
    for (id, organization, value) in [("asm-i1", "org-a", 70), ("asm-i2", "org-b", 30)] {
        repository.seed_completed(scored(
            id,
            "u-http",
            Some(organization),
            Some("insurance"),
            DimensionScores::uniform(value),
            at(2024, 2, 1),
        ));
    }
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/analytics/industries/insurance"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["leader_score"], 70);
    assert_eq!(payload["laggard_score"], 30);
    assert_eq!(payload["total_organizations"], 2);
}
