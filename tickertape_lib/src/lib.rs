//! Library layer for tickertape: quote fetching, the per-symbol store, and
//! the display driver that rotates through tickers and keeps them fresh.
//!
//! Wraps the `tickertape_api` chart client with normalization into
//! [`QuoteResult`], typed errors, and the scheduling around it.

pub mod config;
pub mod driver;
pub mod error;
pub mod fetcher;
pub mod quote;
pub mod rotation;
pub mod schedule;
pub mod store;
pub mod tickers;

pub use tickertape_api;
pub use tickertape_api::types;
pub use tickertape_api::{ChartInterval, ChartQuery, ChartRange};

pub use config::Settings;
pub use driver::{DisplayDriver, LoadOutcome, RefreshSummary, TickerView};
pub use error::{ConfigError, DriverError, FetchError};
pub use fetcher::QuoteFetcher;
pub use quote::{QuoteRequest, QuoteResult, SeriesPoint};
pub use schedule::{Schedule, ScheduleHandle};
pub use store::{CommitOutcome, FetchTicket, QuoteStore, StoredQuote};
pub use tickers::Ticker;
