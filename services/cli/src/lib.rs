mod cli;
mod demo;
mod infra;
mod sweep;

use tripod_assess::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
