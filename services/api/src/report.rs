use crate::infra::build_repository;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talent_ats::config::AppConfig;
use talent_ats::error::AppError;
use talent_ats::workflows::pipeline::{
    CandidateSummary, InterviewStepId, PipelineService, PositionId,
};

#[derive(Args, Debug)]
pub(crate) struct PositionCandidatesArgs {
    /// Position identifier to list candidates for
    #[arg(long)]
    pub(crate) position: i64,
    /// Directory of CSV seed tables (defaults to APP_SEED_DIR)
    #[arg(long)]
    pub(crate) seed_dir: Option<PathBuf>,
}

pub(crate) fn run_position_candidates(args: PositionCandidatesArgs) -> Result<(), AppError> {
    let PositionCandidatesArgs { position, seed_dir } = args;

    let seed_dir = match seed_dir {
        Some(dir) => Some(dir),
        None => AppConfig::load()?.data.seed_dir,
    };

    let repository = Arc::new(build_repository(seed_dir.as_deref())?);
    let service = PipelineService::new(repository);

    let position_id = PositionId(position);
    let flow = service.interview_flow(position_id)?;
    let candidates = service.candidates_for_position(position_id)?;

    println!("Candidate pipeline for {} (#{})", flow.position_title, flow.position_id);
    for line in render_candidates(&candidates, |step| {
        flow.steps
            .iter()
            .find(|candidate_step| candidate_step.id == step)
            .map(|candidate_step| candidate_step.name.clone())
    }) {
        println!("{line}");
    }

    Ok(())
}

fn render_candidates<F>(candidates: &[CandidateSummary], step_name: F) -> Vec<String>
where
    F: Fn(InterviewStepId) -> Option<String>,
{
    if candidates.is_empty() {
        return vec!["- no candidates".to_string()];
    }

    candidates
        .iter()
        .map(|candidate| {
            let step = step_name(candidate.current_interview_step)
                .unwrap_or_else(|| format!("step {}", candidate.current_interview_step));
            let score = candidate
                .average_score
                .map(|score| format!("{score:.1}"))
                .unwrap_or_else(|| "n/a".to_string());
            format!("- {} | {} | avg score {}", candidate.full_name, step, score)
        })
        .collect()
}
