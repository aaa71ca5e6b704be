//! End-to-end scenarios for the candidate pipeline, driven through the public router with the
//! bundled CSV seed data.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use talent_ats::workflows::pipeline::{
    pipeline_router, CandidateId, InMemoryPipelineRepository, InterviewStepId,
    PipelineRepository, PipelineService,
};
use talent_ats::workflows::seed::SeedImporter;

fn seed_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seed")
}

fn seeded() -> (axum::Router, Arc<InMemoryPipelineRepository>) {
    let (repository, _) = SeedImporter::from_dir(seed_dir()).expect("seed imports");
    let repository = Arc::new(repository);
    let service = Arc::new(PipelineService::new(repository.clone()));
    (pipeline_router(service), repository)
}

fn put_stage(id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(format!("/candidates/{id}/stage"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

#[tokio::test]
async fn candidate_advances_through_the_flow() {
    let (router, repository) = seeded();

    let response = router
        .clone()
        .oneshot(put_stage("1", json!({ "stage": 3 })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["data"]["currentInterviewStep"], 3);
    assert_eq!(payload["data"]["positionId"], 1);

    let stored = repository
        .application_for_candidate(CandidateId(1))
        .expect("store readable")
        .expect("application exists");
    assert_eq!(stored.current_interview_step, InterviewStepId(3));

    let response = router
        .oneshot(get("/positions/1/candidates"))
        .await
        .expect("route executes");
    let rows = json_body(response).await;
    let john = rows
        .as_array()
        .expect("array payload")
        .iter()
        .find(|row| row["fullName"] == "John Doe")
        .cloned()
        .expect("john listed");
    assert_eq!(john["currentInterviewStep"], 3);
    assert_eq!(john["averageScore"], 8.5);
}

#[tokio::test]
async fn stage_given_as_numeric_string_is_accepted() {
    let (router, _) = seeded();

    let response = router
        .oneshot(put_stage("3", json!({ "stage": "5" })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["currentInterviewStep"], 5);
}

#[tokio::test]
async fn failed_transition_leaves_application_untouched() {
    let (router, repository) = seeded();

    let response = router
        .oneshot(put_stage("2", json!({ "stage": 42 })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Interview step not found");

    let stored = repository
        .application_for_candidate(CandidateId(2))
        .expect("store readable")
        .expect("application exists");
    assert_eq!(stored.current_interview_step, InterviewStepId(1));
}

#[tokio::test]
async fn candidate_without_application_is_not_found() {
    let (router, _) = seeded();

    let response = router
        .oneshot(put_stage("4", json!({ "stage": 2 })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["error"],
        "Application not found for this candidate"
    );
}

#[tokio::test]
async fn null_stage_counts_as_missing() {
    let (router, _) = seeded();

    let response = router
        .oneshot(put_stage("1", json!({ "stage": null })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Stage is required");
}

#[tokio::test]
async fn draft_position_without_applicants_lists_nothing() {
    let (router, _) = seeded();

    let response = router
        .oneshot(get("/positions/3/candidates"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn interview_flow_for_position_without_flow_is_empty() {
    let (router, _) = seeded();

    let response = router
        .oneshot(get("/positions/3/interview-flow"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["steps"], json!([]));
    assert_eq!(payload["interviewFlowId"], Value::Null);
}
