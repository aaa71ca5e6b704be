use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use super::domain::{CandidateId, InterviewStepId, PositionId};
use super::repository::PipelineRepository;
use super::service::{PipelineService, PipelineServiceError};

const INVALID_ID: &str = "Invalid ID format";
const STAGE_REQUIRED: &str = "Stage is required";
const INVALID_STAGE: &str = "Invalid stage format";
const INVALID_BODY: &str = "Invalid request body";
const INTERNAL_ERROR: &str = "Internal Server Error";

/// Router builder exposing the candidate and position endpoints.
pub fn pipeline_router<R>(service: Arc<PipelineService<R>>) -> Router
where
    R: PipelineRepository + 'static,
{
    Router::new()
        .route("/candidates/:id", get(candidate_handler::<R>))
        .route("/candidates/:id/stage", put(update_stage_handler::<R>))
        .route("/positions", get(positions_handler::<R>))
        .route(
            "/positions/:id/candidates",
            get(position_candidates_handler::<R>),
        )
        .route(
            "/positions/:id/interview-flow",
            get(interview_flow_handler::<R>),
        )
        .with_state(service)
}

/// Body of `PUT /candidates/:id/stage`. The stage is kept loose so missing and malformed
/// values can be told apart.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StageUpdateRequest {
    #[serde(default)]
    pub(crate) stage: Option<Value>,
}

pub(crate) async fn update_stage_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let candidate_id = match parse_id(&raw_id) {
        Some(id) => CandidateId(id),
        None => return error_response(StatusCode::BAD_REQUEST, INVALID_ID),
    };

    let request = match stage_request(&headers, &body) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected stage update body");
            return error_response(StatusCode::BAD_REQUEST, INVALID_BODY);
        }
    };

    let step = match request.stage.as_ref() {
        None => return error_response(StatusCode::BAD_REQUEST, STAGE_REQUIRED),
        Some(value) => match parse_stage(value) {
            Some(step) => step,
            None => return error_response(StatusCode::BAD_REQUEST, INVALID_STAGE),
        },
    };

    let result = service
        .candidate(candidate_id)
        .and_then(|candidate| service.update_stage(candidate.id, step));

    match result {
        Ok(application) => {
            let payload = json!({
                "message": "Stage updated successfully",
                "data": application,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn candidate_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let Some(id) = parse_id(&raw_id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_ID);
    };

    match service.candidate(CandidateId(id)) {
        Ok(candidate) => (StatusCode::OK, Json(candidate)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn positions_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.positions() {
        Ok(positions) => (StatusCode::OK, Json(positions)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn position_candidates_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let Some(id) = parse_id(&raw_id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_ID);
    };

    match service.candidates_for_position(PositionId(id)) {
        Ok(candidates) => (StatusCode::OK, Json(candidates)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn interview_flow_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let Some(id) = parse_id(&raw_id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_ID);
    };

    match service.interview_flow(PositionId(id)) {
        Ok(flow) => (StatusCode::OK, Json(flow)).into_response(),
        Err(err) => service_error_response(err),
    }
}

/// Bodies that are empty or not sent as JSON carry no stage; only malformed JSON is an error.
pub(crate) fn stage_request(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<StageUpdateRequest, serde_json::Error> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false);

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StageUpdateRequest::default());
    }

    serde_json::from_slice(body)
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Accepts JSON integers, whole floats such as `3.0`, and numeric strings; fractional numbers
/// are rejected.
pub(crate) fn parse_stage(value: &Value) -> Option<InterviewStepId> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0)
                    .filter(|float| *float >= i64::MIN as f64 && *float < i64::MAX as f64)
                    .map(|float| float as i64)
            })
            .map(InterviewStepId),
        Value::String(raw) => parse_id(raw).map(InterviewStepId),
        _ => None,
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn service_error_response(err: PipelineServiceError) -> Response {
    let status = match &err {
        PipelineServiceError::InterviewStepNotFound(_) => StatusCode::BAD_REQUEST,
        not_found if not_found.is_not_found() => StatusCode::NOT_FOUND,
        other => {
            error!(error = %other, "pipeline request failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
    };
    error_response(status, &err.to_string())
}
