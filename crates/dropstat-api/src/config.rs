//! Service configuration, loaded from YAML with environment overrides
use dropstat_core::StageInfo;
use dropstat_validators::ValidationPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path of the YAML config file
pub const CONFIG_ENV: &str = "DROPSTAT_CONFIG";

/// Listen address override
pub const ADDR_ENV: &str = "DROPSTAT_ADDR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG/read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("CONFIG/parse: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    pub listen_addr: String,

    /// Look-back used for the per-user and per-IP activity counts
    pub activity_window_minutes: i64,

    /// Lifetime of the identity cookie
    pub cookie_max_age_days: i64,

    pub validation: ValidationPolicy,

    /// Stage catalog served to the validators and the gacha rule
    pub stages: Vec<StageInfo>,
}

impl ServiceConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// `$DROPSTAT_CONFIG` if set, defaults otherwise; `$DROPSTAT_ADDR` wins
    /// over the file's listen address.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        if let Ok(addr) = std::env::var(ADDR_ENV) {
            config.listen_addr = addr;
        }
        Ok(config)
    }

    pub fn activity_window_ms(&self) -> i64 {
        self.activity_window_minutes.saturating_mul(60 * 1000)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8787".to_string(),
            activity_window_minutes: 60,
            cookie_max_age_days: 365,
            validation: ValidationPolicy::standard(),
            stages: Vec::new(),
        }
    }
}
