//! Application configuration.
//!
//! Every setting can come from the environment or a command-line flag (the
//! flag wins); anything left unset falls back to a default.

use std::path::PathBuf;

use anyhow::{Context, bail};
use tenderdesk_observability::LogFormat;
use tenderdesk_storage::DEFAULT_STORAGE_KEY;

pub const DATA_DIR_ENV: &str = "TENDERDESK_DATA_DIR";
pub const STORAGE_KEY_ENV: &str = "TENDERDESK_STORAGE_KEY";
pub const LOG_FORMAT_ENV: &str = "TENDERDESK_LOG_FORMAT";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the blob files.
    pub data_dir: PathBuf,
    /// Key the tender collection is stored under.
    pub storage_key: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn resolve(
        data_dir: Option<PathBuf>,
        storage_key: Option<String>,
        log_format: Option<LogFormat>,
    ) -> anyhow::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let storage_key = storage_key.unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            bail!("storage key must not be empty (check {STORAGE_KEY_ENV})");
        }

        Ok(Self {
            data_dir,
            storage_key,
            log_format: log_format.unwrap_or_default(),
        })
    }
}

/// `{app_data_dir}/tenderdesk`.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .with_context(|| {
            format!("failed to resolve OS app data directory - set {DATA_DIR_ENV} explicitly")
        })?;
    dir.push("tenderdesk");
    Ok(dir)
}
