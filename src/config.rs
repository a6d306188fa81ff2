use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "SPENDLOG_DB";
pub(crate) const LOG_ENV: &str = "SPENDLOG_LOG";
pub(crate) const DEFAULT_LOG_FILTER: &str = "spendlog=warn";
pub(crate) const DEFAULT_EXPORT_PATH: &str = "exports/month.csv";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
}

impl Config {
    /// `SPENDLOG_DB` wins; otherwise the platform data directory.
    pub(crate) fn load() -> Result<Self> {
        let db_path = match std::env::var_os(DB_ENV).filter(|v| !v.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };
        Ok(Self { db_path })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendlog", "spendlog")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendlog.db"))
}
