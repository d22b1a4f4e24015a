use crate::error::AppError;
use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use sdoh_engine::batch::{BatchOutcome, RecalculationScope};
use sdoh_engine::encounters::SubjectId;
use sdoh_engine::records::{ScoreStore, SdohScoreRecord};
use sdoh_engine::report::{compare_to_benchmark, summarize, BenchmarkComparison, PopulationSummary};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;

pub fn scoring_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/api/v1/scores/recalculate", post(recalculate_endpoint))
        .route("/api/v1/scores/:subject_id", get(score_endpoint))
        .route("/api/v1/population/summary", get(summary_endpoint))
        .route("/api/v1/population/benchmark", post(benchmark_endpoint))
        .with_state(state)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "ready": true })))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "ready": false })))
    }
}

/// Scope selection for a recalculation request. `subject_id` wins over
/// `stale`; with neither set the whole population is rescored.
#[derive(Debug, Default, Deserialize)]
pub struct RecalculateRequest {
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub stale: bool,
}

impl RecalculateRequest {
    fn scope(&self) -> RecalculationScope {
        match &self.subject_id {
            Some(subject) => RecalculationScope::Subject(SubjectId::new(subject.clone())),
            None if self.stale => RecalculationScope::Stale,
            None => RecalculationScope::All,
        }
    }
}

async fn recalculate_endpoint(
    State(state): State<AppState>,
    Json(request): Json<RecalculateRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let outcome = state.recalculator.run(request.scope()).await?;
    Ok(Json(outcome))
}

async fn score_endpoint(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let subject = SubjectId::new(subject_id);
    match state.scores.fetch(&subject)? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no score record for subject '{subject}'") })),
        )
            .into_response()),
    }
}

async fn summary_endpoint(
    State(state): State<AppState>,
) -> Result<Json<PopulationSummary>, AppError> {
    let records: Vec<SdohScoreRecord> = state.scores.all()?;
    Ok(Json(summarize(&records)))
}

#[derive(Debug, Deserialize)]
pub struct BenchmarkRequest {
    pub subgroup: String,
    pub measure: String,
    pub observed: f64,
    pub benchmark: f64,
}

async fn benchmark_endpoint(
    Json(request): Json<BenchmarkRequest>,
) -> Json<BenchmarkComparison> {
    Json(compare_to_benchmark(
        request.subgroup,
        request.measure,
        request.observed,
        request.benchmark,
    ))
}
