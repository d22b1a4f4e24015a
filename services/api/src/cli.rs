use crate::config::AppConfig;
use crate::error::AppError;
use crate::import::EncounterCsvImporter;
use crate::infra::{AppState, InMemoryEncounterStore, InMemoryScoreStore};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sdoh_engine::batch::RecalculationScope;
use sdoh_engine::encounters::SubjectId;
use sdoh_engine::records::ScoreStore;
use sdoh_engine::report::{compare_to_benchmark, summarize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "SDOH Risk Scoring Engine",
    about = "Score field-encounter data into composite SDOH risk records",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Recalculate score records from an encounter CSV export
    Recalculate(RecalculateArgs),
    /// Print a population summary for an encounter CSV export
    Summary(SummaryArgs),
    /// Compare a subgroup measure against an external benchmark
    Benchmark(BenchmarkArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Encounter CSV export used to seed the in-memory store
    #[arg(long)]
    pub(crate) encounters: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RecalculateArgs {
    /// Encounter CSV export to score
    #[arg(long)]
    encounters: PathBuf,
    /// Limit the run to one subject
    #[arg(long)]
    subject: Option<String>,
    /// Only rescore subjects whose records are stale
    #[arg(long, conflicts_with = "subject")]
    stale: bool,
    /// Print every resulting score record alongside the batch outcome
    #[arg(long)]
    records: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Encounter CSV export to score and summarize
    #[arg(long)]
    encounters: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct BenchmarkArgs {
    /// Subgroup label, e.g. a service area or demographic cohort
    #[arg(long)]
    subgroup: String,
    /// Which measure is being compared, e.g. "composite" or "housing"
    #[arg(long)]
    measure: String,
    /// Observed mean score for the subgroup
    #[arg(long)]
    observed: f64,
    /// External reference rate to compare against
    #[arg(long)]
    benchmark: f64,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recalculate(args) => run_recalculate(args).await,
        Command::Summary(args) => run_summary(args).await,
        Command::Benchmark(args) => run_benchmark(args),
    }
}

fn state_from_csv(path: &Path) -> Result<AppState, AppError> {
    let config = AppConfig::load()?;
    let encounters = Arc::new(InMemoryEncounterStore::default());
    encounters.extend(EncounterCsvImporter::from_path(path)?);
    let scores = Arc::new(InMemoryScoreStore::default());
    Ok(AppState::new(encounters, scores, config.batch.concurrency))
}

async fn run_recalculate(args: RecalculateArgs) -> Result<(), AppError> {
    let state = state_from_csv(&args.encounters)?;

    let scope = match args.subject {
        Some(subject) => RecalculationScope::Subject(SubjectId::new(subject)),
        None if args.stale => RecalculationScope::Stale,
        None => RecalculationScope::All,
    };
    let outcome = state.recalculator.run(scope).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).expect("outcome serializes")
    );
    if args.records {
        let records = state.scores.all()?;
        println!(
            "{}",
            serde_json::to_string_pretty(&records).expect("records serialize")
        );
    }
    Ok(())
}

async fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let state = state_from_csv(&args.encounters)?;
    state.recalculator.run(RecalculationScope::All).await?;

    let summary = summarize(&state.scores.all()?);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("summary serializes")
    );
    Ok(())
}

fn run_benchmark(args: BenchmarkArgs) -> Result<(), AppError> {
    let comparison =
        compare_to_benchmark(args.subgroup, args.measure, args.observed, args.benchmark);
    println!(
        "{}",
        serde_json::to_string_pretty(&comparison).expect("comparison serializes")
    );
    Ok(())
}
