//! Runtime settings: defaults, optional TOML file, environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tickertape_api::{ChartInterval, ChartRange, DEFAULT_BASE_URL};

use crate::error::ConfigError;
use crate::quote::QuoteRequest;
use crate::tickers::{default_tickers, validate_tickers, Ticker};

/// Rotation periods the display offers, in seconds.
pub const ROTATE_CHOICES: [u64; 6] = [2, 3, 5, 7, 10, 15];

pub const DEFAULT_ROTATE_SECS: u64 = 3;
pub const DEFAULT_REFRESH_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub rotate_seconds: u64,
    pub refresh_seconds: u64,
    pub range: ChartRange,
    pub interval: ChartInterval,
    pub include_pre_post: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(rename = "ticker")]
    pub tickers: Vec<Ticker>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rotate_seconds: DEFAULT_ROTATE_SECS,
            refresh_seconds: DEFAULT_REFRESH_SECS,
            range: ChartRange::default(),
            interval: ChartInterval::default(),
            include_pre_post: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tickers: default_tickers(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML. Missing keys keep their defaults; a file
    /// without `[[ticker]]` entries keeps the built-in table.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then `path` if given, then `TICKERTAPE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let settings = settings.with_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Applies `TICKERTAPE_ROTATE_SECS`, `TICKERTAPE_REFRESH_SECS`,
    /// `TICKERTAPE_TIMEOUT_SECS` and `TICKERTAPE_BASE_URL`. Unparseable
    /// values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        self.rotate_seconds = env_u64("TICKERTAPE_ROTATE_SECS", self.rotate_seconds);
        self.refresh_seconds = env_u64("TICKERTAPE_REFRESH_SECS", self.refresh_seconds);
        self.timeout_secs = env_u64("TICKERTAPE_TIMEOUT_SECS", self.timeout_secs);
        if let Ok(url) = std::env::var("TICKERTAPE_BASE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rotate_seconds(self.rotate_seconds)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.refresh_seconds == 0 {
            return Err(ConfigError::Invalid(
                "refresh_seconds must be greater than zero".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".to_string()));
        }
        validate_tickers(&self.tickers)
    }

    pub fn rotate_period(&self) -> Duration {
        Duration::from_secs(self.rotate_seconds)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Request for `symbol` using the configured range, interval and session flag.
    pub fn request_for(&self, symbol: &str) -> QuoteRequest {
        QuoteRequest::new(symbol)
            .with_range(self.range)
            .with_interval(self.interval)
            .with_pre_post(self.include_pre_post)
    }
}

pub fn validate_rotate_seconds(secs: u64) -> Result<u64, crate::error::DriverError> {
    if ROTATE_CHOICES.contains(&secs) {
        Ok(secs)
    } else {
        Err(crate::error::DriverError::InvalidRotate(secs))
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}
