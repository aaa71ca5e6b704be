use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_ats::error::AppError;
use talent_ats::workflows::pipeline::InMemoryPipelineRepository;
use talent_ats::workflows::seed::SeedImporter;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Hydrate the store from `seed_dir`, or start empty when none is configured.
pub(crate) fn build_repository(
    seed_dir: Option<&Path>,
) -> Result<InMemoryPipelineRepository, AppError> {
    match seed_dir {
        Some(dir) => {
            let (repository, _) = SeedImporter::from_dir(dir)?;
            Ok(repository)
        }
        None => {
            warn!("no seed directory configured; starting with an empty pipeline store");
            Ok(InMemoryPipelineRepository::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use talent_ats::workflows::pipeline::PipelineRepository;

    #[test]
    fn empty_store_without_seed_dir() {
        let repository = build_repository(None).expect("empty store builds");
        assert!(repository.positions().expect("store readable").is_empty());
    }

    #[test]
    fn seeded_store_from_bundled_tables() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../crates/talent-ats/seed");
        let repository = build_repository(Some(dir.as_path())).expect("seed imports");
        assert_eq!(repository.positions().expect("store readable").len(), 3);
    }
}
