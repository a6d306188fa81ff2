mod categorize;
mod config;
mod db;
mod error;
mod import;
mod models;
mod report;
mod run;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    let mut db = db::Database::open(&config.db_path)
        .with_context(|| format!("Failed to open database: {}", config.db_path.display()))?;

    run::as_cli(&args, &mut db)
}

/// Logs go to stderr; stdout carries command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
