//! CSV seed import hydrating the in-memory pipeline store.

mod parser;

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::workflows::pipeline::domain::{
    Application, Candidate, CandidateId, Interview, InterviewStep, InterviewStepId, Position,
    PositionId,
};
use crate::workflows::pipeline::memory::InMemoryPipelineRepository;
use crate::workflows::pipeline::repository::RepositoryError;

use parser::{ApplicationRow, CandidateRow, InterviewRow, PositionRow, StepRow};

pub const INTERVIEW_STEPS_FILE: &str = "interview_steps.csv";
pub const POSITIONS_FILE: &str = "positions.csv";
pub const CANDIDATES_FILE: &str = "candidates.csv";
pub const APPLICATIONS_FILE: &str = "applications.csv";
pub const INTERVIEWS_FILE: &str = "interviews.csv";

#[derive(Debug, thiserror::Error)]
pub enum SeedImportError {
    #[error("failed to read seed data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("{table} row {row_id}: invalid {field} '{value}'")]
    InvalidValue {
        table: &'static str,
        row_id: i64,
        field: &'static str,
        value: String,
    },
    #[error("{table} row {row_id}: {detail}")]
    Integrity {
        table: &'static str,
        row_id: i64,
        detail: String,
    },
    #[error("could not store seed data: {0}")]
    Repository(#[from] RepositoryError),
}

impl SeedImportError {
    pub(crate) fn invalid(
        table: &'static str,
        row_id: i64,
        field: &'static str,
        value: &str,
    ) -> Self {
        Self::InvalidValue {
            table,
            row_id,
            field,
            value: value.to_string(),
        }
    }

    fn integrity(table: &'static str, row_id: i64, detail: impl Into<String>) -> Self {
        Self::Integrity {
            table,
            row_id,
            detail: detail.into(),
        }
    }
}

/// Parsed seed tables, validated for referential integrity before loading.
#[derive(Debug, Default, Clone)]
pub struct SeedDataset {
    pub interview_steps: Vec<InterviewStep>,
    pub positions: Vec<Position>,
    pub candidates: Vec<Candidate>,
    pub applications: Vec<Application>,
    pub interviews: Vec<Interview>,
}

/// Row counts loaded by an import, for logs and CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub interview_steps: usize,
    pub positions: usize,
    pub candidates: usize,
    pub applications: usize,
    pub interviews: usize,
}

impl SeedDataset {
    /// Read every table from `dir`. Missing files are read as empty tables.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, SeedImportError> {
        let dir = dir.as_ref();
        let open = |name: &str| -> Result<Option<File>, SeedImportError> {
            let path = dir.join(name);
            if path.is_file() {
                Ok(Some(File::open(path)?))
            } else {
                debug!(file = %path.display(), "seed table absent, treating as empty");
                Ok(None)
            }
        };

        let mut dataset = SeedDataset::default();
        if let Some(file) = open(INTERVIEW_STEPS_FILE)? {
            dataset.interview_steps = Self::read_interview_steps(file)?;
        }
        if let Some(file) = open(POSITIONS_FILE)? {
            dataset.positions = Self::read_positions(file)?;
        }
        if let Some(file) = open(CANDIDATES_FILE)? {
            dataset.candidates = Self::read_candidates(file)?;
        }
        if let Some(file) = open(APPLICATIONS_FILE)? {
            dataset.applications = Self::read_applications(file)?;
        }
        if let Some(file) = open(INTERVIEWS_FILE)? {
            dataset.interviews = Self::read_interviews(file)?;
        }
        Ok(dataset)
    }

    pub fn read_interview_steps<R: Read>(reader: R) -> Result<Vec<InterviewStep>, SeedImportError> {
        let rows: Vec<StepRow> = parser::read_rows(reader)?;
        Ok(rows.into_iter().map(InterviewStep::from).collect())
    }

    pub fn read_positions<R: Read>(reader: R) -> Result<Vec<Position>, SeedImportError> {
        let rows: Vec<PositionRow> = parser::read_rows(reader)?;
        rows.into_iter().map(PositionRow::into_position).collect()
    }

    pub fn read_candidates<R: Read>(reader: R) -> Result<Vec<Candidate>, SeedImportError> {
        let rows: Vec<CandidateRow> = parser::read_rows(reader)?;
        Ok(rows.into_iter().map(Candidate::from).collect())
    }

    pub fn read_applications<R: Read>(reader: R) -> Result<Vec<Application>, SeedImportError> {
        let rows: Vec<ApplicationRow> = parser::read_rows(reader)?;
        rows.into_iter()
            .map(ApplicationRow::into_application)
            .collect()
    }

    pub fn read_interviews<R: Read>(reader: R) -> Result<Vec<Interview>, SeedImportError> {
        let rows: Vec<InterviewRow> = parser::read_rows(reader)?;
        rows.into_iter().map(InterviewRow::into_interview).collect()
    }

    /// Check the foreign keys between tables without touching any store.
    pub fn validate(&self) -> Result<(), SeedImportError> {
        let steps: HashSet<InterviewStepId> =
            self.interview_steps.iter().map(|step| step.id).collect();
        let positions: HashSet<PositionId> =
            self.positions.iter().map(|position| position.id).collect();
        let candidates: HashSet<CandidateId> =
            self.candidates.iter().map(|candidate| candidate.id).collect();

        for application in &self.applications {
            let row_id = application.id.0;
            if !steps.contains(&application.current_interview_step) {
                return Err(SeedImportError::integrity(
                    "applications",
                    row_id,
                    format!(
                        "unknown interview step {}",
                        application.current_interview_step
                    ),
                ));
            }
            if !positions.contains(&application.position_id) {
                return Err(SeedImportError::integrity(
                    "applications",
                    row_id,
                    format!("unknown position {}", application.position_id),
                ));
            }
            if !candidates.contains(&application.candidate_id) {
                return Err(SeedImportError::integrity(
                    "applications",
                    row_id,
                    format!("unknown candidate {}", application.candidate_id),
                ));
            }
        }

        let applications: HashSet<_> = self.applications.iter().map(|app| app.id).collect();
        let mut interview_ids = HashSet::new();
        for interview in &self.interviews {
            if !interview_ids.insert(interview.id) {
                return Err(SeedImportError::integrity(
                    "interviews",
                    interview.id.0,
                    "duplicate id",
                ));
            }
            if !applications.contains(&interview.application_id) {
                return Err(SeedImportError::integrity(
                    "interviews",
                    interview.id.0,
                    format!("unknown application {}", interview.application_id),
                ));
            }
            if !steps.contains(&interview.interview_step_id) {
                return Err(SeedImportError::integrity(
                    "interviews",
                    interview.id.0,
                    format!("unknown interview step {}", interview.interview_step_id),
                ));
            }
        }

        Ok(())
    }

    /// Validate and then insert every row into `repository`.
    pub fn load_into(
        self,
        repository: &InMemoryPipelineRepository,
    ) -> Result<SeedSummary, SeedImportError> {
        self.validate()?;

        let summary = SeedSummary {
            interview_steps: self.interview_steps.len(),
            positions: self.positions.len(),
            candidates: self.candidates.len(),
            applications: self.applications.len(),
            interviews: self.interviews.len(),
        };

        for step in self.interview_steps {
            let id = step.id.0;
            repository
                .insert_interview_step(step)
                .map_err(|err| duplicate_or("interview_steps", id, err))?;
        }
        for position in self.positions {
            let id = position.id.0;
            repository
                .insert_position(position)
                .map_err(|err| duplicate_or("positions", id, err))?;
        }
        for candidate in self.candidates {
            let id = candidate.id.0;
            repository
                .insert_candidate(candidate)
                .map_err(|err| duplicate_or("candidates", id, err))?;
        }
        for application in self.applications {
            let id = application.id.0;
            repository
                .insert_application(application)
                .map_err(|err| duplicate_or("applications", id, err))?;
        }
        for interview in self.interviews {
            let id = interview.id.0;
            repository
                .insert_interview(interview)
                .map_err(|err| duplicate_or("interviews", id, err))?;
        }

        Ok(summary)
    }
}

fn duplicate_or(table: &'static str, row_id: i64, err: RepositoryError) -> SeedImportError {
    match err {
        RepositoryError::Conflict => SeedImportError::integrity(table, row_id, "duplicate id"),
        other => SeedImportError::Repository(other),
    }
}

pub struct SeedImporter;

impl SeedImporter {
    /// Build a fresh in-memory store from the CSV tables in `dir`.
    pub fn from_dir<P: AsRef<Path>>(
        dir: P,
    ) -> Result<(InMemoryPipelineRepository, SeedSummary), SeedImportError> {
        let dir = dir.as_ref();
        let dataset = SeedDataset::from_dir(dir)?;
        let repository = InMemoryPipelineRepository::default();
        let summary = dataset.load_into(&repository)?;

        info!(
            dir = %dir.display(),
            steps = summary.interview_steps,
            positions = summary.positions,
            candidates = summary.candidates,
            applications = summary.applications,
            interviews = summary.interviews,
            "seed data imported"
        );
        Ok((repository, summary))
    }
}
