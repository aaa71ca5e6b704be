use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::pipeline::domain::{
    Application, ApplicationId, Candidate, CandidateId, CandidateSummary, Interview,
    InterviewFlowId, InterviewId, InterviewStep, InterviewStepId, Position, PositionId,
    PositionStatus,
};
use crate::workflows::pipeline::memory::InMemoryPipelineRepository;
use crate::workflows::pipeline::repository::{PipelineRepository, RepositoryError};
use crate::workflows::pipeline::{pipeline_router, PipelineService};

pub(super) fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn candidate(id: i64, first: &str, last: &str) -> Candidate {
    Candidate {
        id: CandidateId(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@example.com", first, last).to_lowercase(),
        phone: None,
        address: None,
    }
}

pub(super) fn step(id: i64, flow: i64, name: &str, order_index: u32) -> InterviewStep {
    InterviewStep {
        id: InterviewStepId(id),
        interview_flow_id: InterviewFlowId(flow),
        name: name.to_string(),
        order_index,
    }
}

pub(super) fn position(id: i64, title: &str, flow: Option<i64>) -> Position {
    Position {
        id: PositionId(id),
        title: title.to_string(),
        status: PositionStatus::Open,
        is_visible: true,
        interview_flow_id: flow.map(InterviewFlowId),
    }
}

pub(super) fn application(id: i64, position: i64, candidate: i64, step: i64) -> Application {
    Application {
        id: ApplicationId(id),
        position_id: PositionId(position),
        candidate_id: CandidateId(candidate),
        application_date: timestamp(2024, 1, 1),
        current_interview_step: InterviewStepId(step),
        notes: None,
        interviews: Vec::new(),
    }
}

pub(super) fn interview(id: i64, application: i64, step: i64, score: Option<u8>) -> Interview {
    Interview {
        id: InterviewId(id),
        application_id: ApplicationId(application),
        interview_step_id: InterviewStepId(step),
        interview_date: timestamp(2024, 2, id as u32),
        result: None,
        score,
        notes: None,
    }
}

/// Two positions sharing flow 1: John (scored 8 and 9) and Jane (unscored) apply to the
/// engineer role; the designer role has no applicants. Carl has no application at all.
pub(super) fn seeded_repository() -> InMemoryPipelineRepository {
    let repository = InMemoryPipelineRepository::default();
    for step in [
        step(1, 1, "Initial Screening", 1),
        step(3, 1, "Manager Interview", 3),
        step(2, 1, "Technical Interview", 2),
    ] {
        repository.insert_interview_step(step).expect("step inserts");
    }

    repository
        .insert_position(position(1, "Software Engineer", Some(1)))
        .expect("position inserts");
    repository
        .insert_position(position(2, "Product Designer", None))
        .expect("position inserts");

    for candidate in [
        candidate(1, "John", "Doe"),
        candidate(2, "Jane", "Smith"),
        candidate(3, "Carl", "Jones"),
    ] {
        repository.insert_candidate(candidate).expect("candidate inserts");
    }

    repository
        .insert_application(application(1, 1, 1, 2))
        .expect("application inserts");
    repository
        .insert_application(application(2, 1, 2, 1))
        .expect("application inserts");

    repository
        .insert_interview(interview(1, 1, 1, Some(8)))
        .expect("interview inserts");
    repository
        .insert_interview(interview(2, 1, 2, Some(9)))
        .expect("interview inserts");
    repository
        .insert_interview(interview(3, 2, 1, None))
        .expect("interview inserts");

    repository
}

pub(super) fn build_service() -> (
    PipelineService<InMemoryPipelineRepository>,
    Arc<InMemoryPipelineRepository>,
) {
    let repository = Arc::new(seeded_repository());
    let service = PipelineService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(
    service: PipelineService<InMemoryPipelineRepository>,
) -> axum::Router {
    pipeline_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

impl PipelineRepository for UnavailableRepository {
    fn candidate(&self, _id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn position(&self, _id: PositionId) -> Result<Option<Position>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn interview_step(
        &self,
        _id: InterviewStepId,
    ) -> Result<Option<InterviewStep>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn interview_flow(&self, _id: InterviewFlowId) -> Result<Vec<InterviewStep>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn application_for_candidate(
        &self,
        _candidate_id: CandidateId,
    ) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_interview_step(
        &self,
        _application_id: ApplicationId,
        _step: InterviewStepId,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn candidate_summaries(
        &self,
        _position_id: PositionId,
    ) -> Result<Vec<CandidateSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
