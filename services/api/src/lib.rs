mod cli;
mod server;

pub mod config;
pub mod error;
pub mod import;
pub mod infra;
pub mod routes;
pub mod telemetry;

pub use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
