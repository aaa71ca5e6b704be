use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Application, ApplicationId, Candidate, CandidateId, CandidateSummary, Interview,
    InterviewFlowId, InterviewStep, InterviewStepId, Position, PositionId,
};
use super::repository::{PipelineRepository, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    candidates: BTreeMap<CandidateId, Candidate>,
    positions: BTreeMap<PositionId, Position>,
    steps: BTreeMap<InterviewStepId, InterviewStep>,
    applications: BTreeMap<ApplicationId, Application>,
}

/// Mutex-guarded in-memory store used by the service binary and the test suites.
///
/// Interviews are stored nested in their application so reads return them attached.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPipelineRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryPipelineRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    pub fn insert_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if tables.candidates.contains_key(&candidate.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.candidates.insert(candidate.id, candidate);
        Ok(())
    }

    pub fn insert_position(&self, position: Position) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if tables.positions.contains_key(&position.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.positions.insert(position.id, position);
        Ok(())
    }

    pub fn insert_interview_step(&self, step: InterviewStep) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if tables.steps.contains_key(&step.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.steps.insert(step.id, step);
        Ok(())
    }

    /// Stores an application. Its current step must already exist in the step table.
    pub fn insert_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if tables.applications.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        if !tables.steps.contains_key(&application.current_interview_step) {
            return Err(RepositoryError::NotFound);
        }
        tables.applications.insert(application.id, application);
        Ok(())
    }

    pub fn insert_interview(&self, interview: Interview) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        let duplicate = tables
            .applications
            .values()
            .flat_map(|application| application.interviews.iter())
            .any(|existing| existing.id == interview.id);
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        let application = tables
            .applications
            .get_mut(&interview.application_id)
            .ok_or(RepositoryError::NotFound)?;
        application.interviews.push(interview);
        application
            .interviews
            .sort_by(|a, b| a.interview_date.cmp(&b.interview_date));
        Ok(())
    }
}

impl PipelineRepository for InMemoryPipelineRepository {
    fn candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self.lock()?.candidates.get(&id).cloned())
    }

    fn position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError> {
        Ok(self.lock()?.positions.get(&id).cloned())
    }

    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        Ok(self.lock()?.positions.values().cloned().collect())
    }

    fn interview_step(
        &self,
        id: InterviewStepId,
    ) -> Result<Option<InterviewStep>, RepositoryError> {
        Ok(self.lock()?.steps.get(&id).cloned())
    }

    fn interview_flow(&self, id: InterviewFlowId) -> Result<Vec<InterviewStep>, RepositoryError> {
        let tables = self.lock()?;
        let mut steps: Vec<InterviewStep> = tables
            .steps
            .values()
            .filter(|step| step.interview_flow_id == id)
            .cloned()
            .collect();
        steps.sort_by_key(|step| (step.order_index, step.id));
        Ok(steps)
    }

    fn application_for_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<Option<Application>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .applications
            .values()
            .find(|application| application.candidate_id == candidate_id)
            .cloned())
    }

    fn set_interview_step(
        &self,
        application_id: ApplicationId,
        step: InterviewStepId,
    ) -> Result<Application, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.steps.contains_key(&step) {
            return Err(RepositoryError::NotFound);
        }
        let application = tables
            .applications
            .get_mut(&application_id)
            .ok_or(RepositoryError::NotFound)?;
        application.current_interview_step = step;
        Ok(application.clone())
    }

    fn candidate_summaries(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<CandidateSummary>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .applications
            .values()
            .filter(|application| application.position_id == position_id)
            .filter_map(|application| {
                tables
                    .candidates
                    .get(&application.candidate_id)
                    .map(|candidate| CandidateSummary::new(candidate, application))
            })
            .collect())
    }
}
