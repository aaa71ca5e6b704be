//! Candidate pipeline: candidate lookup, interview stage transitions, and per-position
//! candidate listings backed by a pluggable repository.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, Candidate, CandidateId, CandidateSummary, Interview,
    InterviewFlowId, InterviewFlowView, InterviewId, InterviewStep, InterviewStepId, Position,
    PositionId, PositionStatus,
};
pub use memory::InMemoryPipelineRepository;
pub use repository::{PipelineRepository, RepositoryError};
pub use router::pipeline_router;
pub use service::{PipelineService, PipelineServiceError};
