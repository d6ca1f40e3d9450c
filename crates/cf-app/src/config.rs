//! Application configuration.
//!
//! Read from an optional YAML file, then overridden by `CYLFILL_*`
//! environment variables.

use std::path::{Path, PathBuf};

use cf_core::ReportZone;
use cf_fill::SessionDefaults;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "cylfill.yaml";

const ENV_DATA_DIR: &str = "CYLFILL_DATA_DIR";
const ENV_TIME_ZONE: &str = "CYLFILL_TIME_ZONE";
const ENV_DEBUG_FEATURES: &str = "CYLFILL_DEBUG_FEATURES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the stored session and log.
    pub data_dir: PathBuf,
    /// `local`, `utc`, or a fixed offset such as `+01:00`.
    pub time_zone: String,
    /// Enables demo-only commands such as seeding fake log entries.
    pub debug_features: bool,
    /// Parameters a fresh session starts with.
    pub defaults: SessionDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".cylfill"),
            time_zone: "local".to_string(),
            debug_features: false,
            defaults: SessionDefaults::default(),
        }
    }
}

impl Config {
    /// Load `path`, or `cylfill.yaml` if present, or the defaults; then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.report_zone()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `CYLFILL_DATA_DIR`, `CYLFILL_TIME_ZONE` and
    /// `CYLFILL_DEBUG_FEATURES` as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(zone) = lookup(ENV_TIME_ZONE).filter(|v| !v.is_empty()) {
            self.time_zone = zone;
        }
        if let Some(flag) = lookup(ENV_DEBUG_FEATURES) {
            self.debug_features = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
    }

    pub fn report_zone(&self) -> AppResult<ReportZone> {
        self.time_zone
            .parse()
            .map_err(|e: cf_core::CoreError| AppError::Config(e.to_string()))
    }
}
