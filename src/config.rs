//! Runtime settings read from the environment (and `.env`, loaded by the binary).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::loader::sources::{CACHE_FILE_NAME, RIDERSHIP_URL};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/sncf_insights.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `SNCF_RIDERSHIP_URL`
    pub ridership_url: String,
    /// `SNCF_DATA_DIR`; holds the cached ridership table.
    pub data_dir: PathBuf,
    /// `SNCF_HTTP_TIMEOUT_SECS`
    pub http_timeout: Duration,
    /// `LOG_FILE_PATH`
    pub log_file_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ridership_url: RIDERSHIP_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset or empty keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(url) = get("SNCF_RIDERSHIP_URL") {
            settings.ridership_url = url;
        }
        if let Some(dir) = get("SNCF_DATA_DIR") {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = get("SNCF_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("SNCF_HTTP_TIMEOUT_SECS must be whole seconds, got {secs:?}"))?;
            settings.http_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = get("LOG_FILE_PATH") {
            settings.log_file_path = PathBuf::from(path);
        }

        Ok(settings)
    }

    /// Where the remote ridership table is cached.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(CACHE_FILE_NAME)
    }
}
