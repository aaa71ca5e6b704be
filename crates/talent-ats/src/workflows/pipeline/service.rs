use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    Application, Candidate, CandidateId, CandidateSummary, InterviewFlowView, InterviewStepId,
    Position, PositionId,
};
use super::repository::{PipelineRepository, RepositoryError};

/// Service exposing candidate lookup, stage transitions, and position pipelines.
pub struct PipelineService<R> {
    repository: Arc<R>,
}

impl<R> PipelineService<R>
where
    R: PipelineRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Fetch a candidate, failing when the identifier is unknown.
    pub fn candidate(&self, candidate_id: CandidateId) -> Result<Candidate, PipelineServiceError> {
        self.repository
            .candidate(candidate_id)?
            .ok_or(PipelineServiceError::CandidateNotFound(candidate_id))
    }

    /// Move the candidate's application to `step`.
    ///
    /// The step is validated against the reference table before the application is looked
    /// up, so an unknown step is reported even for candidates without an application.
    pub fn update_stage(
        &self,
        candidate_id: CandidateId,
        step: InterviewStepId,
    ) -> Result<Application, PipelineServiceError> {
        if self.repository.interview_step(step)?.is_none() {
            return Err(PipelineServiceError::InterviewStepNotFound(step));
        }

        let application = self
            .repository
            .application_for_candidate(candidate_id)?
            .ok_or(PipelineServiceError::ApplicationNotFound(candidate_id))?;

        let previous = application.current_interview_step;
        let updated = self.repository.set_interview_step(application.id, step)?;

        info!(
            candidate = %candidate_id,
            application = %updated.id,
            from = %previous,
            to = %step,
            "interview stage updated"
        );
        Ok(updated)
    }

    /// Candidates in a position's pipeline; an existing position with no applicants is empty.
    pub fn candidates_for_position(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<CandidateSummary>, PipelineServiceError> {
        self.require_position(position_id)?;
        let summaries = self.repository.candidate_summaries(position_id)?;
        debug!(position = %position_id, count = summaries.len(), "listed position candidates");
        Ok(summaries)
    }

    pub fn positions(&self) -> Result<Vec<Position>, PipelineServiceError> {
        Ok(self.repository.positions()?)
    }

    /// Ordered interview steps for a position's flow.
    pub fn interview_flow(
        &self,
        position_id: PositionId,
    ) -> Result<InterviewFlowView, PipelineServiceError> {
        let position = self.require_position(position_id)?;
        let steps = match position.interview_flow_id {
            Some(flow_id) => self.repository.interview_flow(flow_id)?,
            None => Vec::new(),
        };

        Ok(InterviewFlowView {
            position_id: position.id,
            position_title: position.title,
            interview_flow_id: position.interview_flow_id,
            steps,
        })
    }

    fn require_position(&self, position_id: PositionId) -> Result<Position, PipelineServiceError> {
        self.repository
            .position(position_id)?
            .ok_or(PipelineServiceError::PositionNotFound(position_id))
    }
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error("Candidate not found")]
    CandidateNotFound(CandidateId),
    #[error("Application not found for this candidate")]
    ApplicationNotFound(CandidateId),
    #[error("Interview step not found")]
    InterviewStepNotFound(InterviewStepId),
    #[error("Position not found")]
    PositionNotFound(PositionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PipelineServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PipelineServiceError::CandidateNotFound(_)
                | PipelineServiceError::ApplicationNotFound(_)
                | PipelineServiceError::PositionNotFound(_)
        )
    }
}
