use super::domain::{
    Application, ApplicationId, Candidate, CandidateId, CandidateSummary, InterviewFlowId,
    InterviewStep, InterviewStepId, Position, PositionId,
};

/// Storage abstraction over the recruiting tables so the service can be exercised in isolation.
pub trait PipelineRepository: Send + Sync {
    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError>;
    fn positions(&self) -> Result<Vec<Position>, RepositoryError>;
    fn interview_step(&self, id: InterviewStepId)
        -> Result<Option<InterviewStep>, RepositoryError>;
    /// Steps belonging to a flow, ordered by their order index.
    fn interview_flow(&self, id: InterviewFlowId) -> Result<Vec<InterviewStep>, RepositoryError>;
    /// First application owned by the candidate, with its interviews attached.
    fn application_for_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<Option<Application>, RepositoryError>;
    /// Single-field update of the application's current step. Returns the updated record.
    fn set_interview_step(
        &self,
        application_id: ApplicationId,
        step: InterviewStepId,
    ) -> Result<Application, RepositoryError>;
    /// Candidates in a position's pipeline with their aggregated interview scores.
    fn candidate_summaries(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<CandidateSummary>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
