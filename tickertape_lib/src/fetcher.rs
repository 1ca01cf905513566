//! Stateless quote fetcher: one request, one normalized [`QuoteResult`].

use std::time::Duration;

use tickertape_api::Client;

use crate::error::FetchError;
use crate::quote::{QuoteRequest, QuoteResult};

/// Fetches and normalizes chart data for a single symbol.
///
/// No retries and no caching. Holds nothing between calls except the
/// underlying HTTP connection pool, so concurrent fetches never interact.
pub struct QuoteFetcher {
    inner: Client,
}

impl QuoteFetcher {
    /// Creates a fetcher against the production host.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            inner: Client::new()?,
        })
    }

    /// Creates a fetcher with a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            inner: Client::with_base_url(base_url)?,
        })
    }

    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            inner: Client::with_options(base_url, timeout)?,
        })
    }

    pub async fn fetch(&self, request: &QuoteRequest) -> Result<QuoteResult, FetchError> {
        let symbol = request.symbol.as_str();
        // Sent verbatim, so a padded symbol would be stored under a key
        // that differs from the one requested.
        if symbol.trim().is_empty() || symbol.trim() != symbol {
            return Err(FetchError::InvalidSymbol(request.symbol.clone()));
        }

        let resp = self.inner.get_chart(symbol, &request.to_query()).await?;
        let chart = resp.into_first_result().ok_or_else(|| {
            tracing::debug!("No chart result for {}", symbol);
            FetchError::NoData {
                symbol: symbol.to_string(),
            }
        })?;

        Ok(QuoteResult::from_chart(&chart))
    }
}
