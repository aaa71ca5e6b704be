use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::io::Read;

use super::SeedImportError;
use crate::workflows::pipeline::domain::{
    Application, ApplicationId, Candidate, CandidateId, Interview, InterviewFlowId, InterviewId,
    InterviewStep, InterviewStepId, Position, PositionId, PositionStatus,
};

pub(crate) fn read_rows<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<T>().collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct StepRow {
    id: i64,
    interview_flow_id: i64,
    name: String,
    order_index: u32,
}

impl From<StepRow> for InterviewStep {
    fn from(row: StepRow) -> Self {
        InterviewStep {
            id: InterviewStepId(row.id),
            interview_flow_id: InterviewFlowId(row.interview_flow_id),
            name: row.name,
            order_index: row.order_index,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PositionRow {
    id: i64,
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_visible: Option<String>,
    #[serde(default)]
    interview_flow_id: Option<i64>,
}

impl PositionRow {
    pub(crate) fn into_position(self) -> Result<Position, SeedImportError> {
        let status = match self.status.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("open") => PositionStatus::Open,
            Some("draft") => PositionStatus::Draft,
            Some("closed") => PositionStatus::Closed,
            Some(other) => {
                return Err(SeedImportError::invalid("positions", self.id, "status", other))
            }
        };
        let is_visible = match self.is_visible.as_deref() {
            None => true,
            Some(raw) => parse_bool(raw).ok_or_else(|| {
                SeedImportError::invalid("positions", self.id, "is_visible", raw)
            })?,
        };

        Ok(Position {
            id: PositionId(self.id),
            title: self.title,
            status,
            is_visible,
            interview_flow_id: self.interview_flow_id.map(InterviewFlowId),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Candidate {
            id: CandidateId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationRow {
    id: i64,
    position_id: i64,
    candidate_id: i64,
    application_date: String,
    current_interview_step: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl ApplicationRow {
    pub(crate) fn into_application(self) -> Result<Application, SeedImportError> {
        let application_date = parse_timestamp(&self.application_date).ok_or_else(|| {
            SeedImportError::invalid(
                "applications",
                self.id,
                "application_date",
                &self.application_date,
            )
        })?;

        Ok(Application {
            id: ApplicationId(self.id),
            position_id: PositionId(self.position_id),
            candidate_id: CandidateId(self.candidate_id),
            application_date,
            current_interview_step: InterviewStepId(self.current_interview_step),
            notes: self.notes,
            interviews: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterviewRow {
    id: i64,
    application_id: i64,
    interview_step_id: i64,
    interview_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    result: Option<String>,
    #[serde(default)]
    score: Option<u8>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl InterviewRow {
    pub(crate) fn into_interview(self) -> Result<Interview, SeedImportError> {
        let interview_date = parse_timestamp(&self.interview_date).ok_or_else(|| {
            SeedImportError::invalid("interviews", self.id, "interview_date", &self.interview_date)
        })?;

        Ok(Interview {
            id: InterviewId(self.id),
            application_id: ApplicationId(self.application_id),
            interview_step_id: InterviewStepId(self.interview_step_id),
            interview_date,
            result: self.result,
            score: self.score,
            notes: self.notes,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
