use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a candidate record.
    CandidateId
);
numeric_id!(
    /// Identifier of an open (or closed) job position.
    PositionId
);
numeric_id!(
    /// Identifier of the candidate/position application record.
    ApplicationId
);
numeric_id!(
    /// Identifier into the interview step reference table.
    InterviewStepId
);
numeric_id!(InterviewFlowId);
numeric_id!(InterviewId);

/// Person applying to one or more positions. Read-only in the pipeline flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Draft,
    Open,
    Closed,
}

/// Job position candidates apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub title: String,
    pub status: PositionStatus,
    pub is_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_flow_id: Option<InterviewFlowId>,
}

/// One phase of an interview flow. The table is reference data: steps are only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStep {
    pub id: InterviewStepId,
    pub interview_flow_id: InterviewFlowId,
    pub name: String,
    pub order_index: u32,
}

/// Interview held as part of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub interview_step_id: InterviewStepId,
    pub interview_date: DateTime<Utc>,
    pub result: Option<String>,
    pub score: Option<u8>,
    pub notes: Option<String>,
}

/// Links a candidate to a position and tracks the step they have reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub position_id: PositionId,
    pub candidate_id: CandidateId,
    pub application_date: DateTime<Utc>,
    pub current_interview_step: InterviewStepId,
    pub notes: Option<String>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
}

impl Application {
    /// Mean of the scored interviews, `None` when nothing has been scored yet.
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .interviews
            .iter()
            .filter_map(|interview| interview.score.map(f64::from))
            .collect();

        if scores.is_empty() {
            return None;
        }

        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

/// Row returned when listing the candidates in a position's pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub full_name: String,
    pub current_interview_step: InterviewStepId,
    pub average_score: Option<f64>,
}

impl CandidateSummary {
    pub fn new(candidate: &Candidate, application: &Application) -> Self {
        Self {
            full_name: candidate.full_name(),
            current_interview_step: application.current_interview_step,
            average_score: application.average_score(),
        }
    }
}

/// Ordered interview steps configured for a position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFlowView {
    pub position_id: PositionId,
    pub position_title: String,
    pub interview_flow_id: Option<InterviewFlowId>,
    pub steps: Vec<InterviewStep>,
}
