use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::import::EncounterCsvImporter;
use crate::infra::{AppState, InMemoryEncounterStore, InMemoryScoreStore};
use crate::routes::scoring_router;
use crate::telemetry;
use sdoh_engine::batch::RecalculationScope;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let encounters = Arc::new(InMemoryEncounterStore::default());
    if let Some(path) = args.encounters.as_ref() {
        let imported = EncounterCsvImporter::from_path(path)?;
        info!(count = imported.len(), path = %path.display(), "seeded encounter store");
        encounters.extend(imported);
    }

    let scores = Arc::new(InMemoryScoreStore::default());
    let state = AppState::new(encounters, scores, config.batch.concurrency);

    // Score whatever was seeded so read endpoints are serviceable immediately.
    if let Some(outcome) = initial_recalculation(&state).await? {
        info!(
            considered = outcome.considered,
            succeeded = outcome.succeeded,
            failed = outcome.errors.len(),
            "initial score recalculation complete"
        );
    }

    let readiness = Arc::clone(&state.readiness);
    let app = scoring_router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sdoh risk scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn initial_recalculation(
    state: &AppState,
) -> Result<Option<sdoh_engine::batch::BatchOutcome>, AppError> {
    let outcome = state.recalculator.run(RecalculationScope::All).await?;
    if outcome.considered == 0 {
        return Ok(None);
    }
    Ok(Some(outcome))
}
