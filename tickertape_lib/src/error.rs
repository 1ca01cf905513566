//! Error types for the library layer.

use thiserror::Error;

/// Why a single quote fetch failed.
///
/// The three upstream kinds stay distinct so callers can tell a flaky
/// network from a symbol that simply has no data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),
    /// The body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// Valid JSON, but no usable `chart.result` entry.
    #[error("No data for {symbol}")]
    NoData { symbol: String },
    /// Rejected before any request was sent.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

impl From<tickertape_api::Error> for FetchError {
    fn from(e: tickertape_api::Error) -> Self {
        match e {
            tickertape_api::Error::RequestFailed(msg) => Self::Network(msg),
            tickertape_api::Error::HttpStatus { status, body } => {
                if body.is_empty() {
                    Self::Network(format!("HTTP {}", status))
                } else {
                    Self::Network(format!("HTTP {}: {}", status, body))
                }
            }
            tickertape_api::Error::ParseFailed(msg) => Self::Parse(msg),
        }
    }
}

/// Errors from the display driver and its schedules.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DriverError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("Rotation interval {0}s not allowed (choose one of 2, 3, 5, 7, 10, 15)")]
    InvalidRotate(u64),
    #[error("Schedule period for '{0}' must be greater than zero")]
    InvalidPeriod(String),
}

/// Errors from loading or validating [`crate::config::Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
