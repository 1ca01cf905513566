//! HTTP client for the Yahoo Finance chart API.

use std::time::Duration;

use url::Url;

use crate::{
    query::{ChartQuery, Query},
    types::ChartResponse,
    user_agent::get_user_agent,
    Error,
};

/// Production host for the chart endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Yahoo Finance chart API.
///
/// Holds no state between calls beyond the connection pool. Each client is
/// built with a randomized browser user agent.
pub struct Client {
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at the production Yahoo host.
    pub fn new() -> Result<Self, Error> {
        Self::with_options(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_options(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;
        Ok(Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    /// Builds the chart URL for `symbol`. The symbol is encoded as a single
    /// path segment with the same rules as JavaScript's `encodeURIComponent`
    /// for the characters tickers use (`^GSPC` becomes `%5EGSPC`).
    pub fn chart_url(&self, symbol: &str, query: &ChartQuery) -> Result<Url, Error> {
        let encoded: String = url::form_urlencoded::byte_serialize(symbol.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        let url = Url::parse(&format!(
            "{}/v8/finance/chart/{}",
            self.base_api_url, encoded
        ))
        .map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed(e.to_string())
        })?;
        Ok(query.add_to_url(&url))
    }

    /// Fetches the raw chart payload for one symbol.
    ///
    /// A non-2xx status is reported as [`Error::HttpStatus`] without looking
    /// at the body as JSON. Only a body that is not JSON at all is
    /// [`Error::ParseFailed`]; valid JSON of any other shape (`null`, a
    /// string, a mistyped `chart`) decodes to a response without results.
    pub async fn get_chart(
        &self,
        symbol: &str,
        query: &ChartQuery,
    ) -> Result<ChartResponse, Error> {
        let url = self.chart_url(symbol, query)?;
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get chart for {}: {}", symbol, e);
                Error::RequestFailed(e.to_string())
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let value = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse chart: {} | body: {}", e, snippet);
            Error::ParseFailed(e.to_string())
        })?;

        Ok(ChartResponse::from_value(value))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::with_base_url("https://example.com/").unwrap()
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "https://example.com");
    }

    #[test]
    fn chart_url_encodes_symbol() {
        let url = client()
            .chart_url("^GSPC", &ChartQuery::default())
            .unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/%5EGSPC");

        let url = client()
            .chart_url("BTC-USD", &ChartQuery::default())
            .unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/BTC-USD");

        let url = client().chart_url("A/B C", &ChartQuery::default()).unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/A%2FB%20C");
    }

    #[test]
    fn chart_url_carries_query() {
        let url = client()
            .chart_url("NVDA", &ChartQuery::default().with_pre_post(false))
            .unwrap();
        assert_eq!(
            url.query(),
            Some("range=1d&interval=1m&includePrePost=false")
        );
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }

    #[test]
    fn truncate_respects_char_boundary() {
        let body = format!("{}é{}", "a".repeat(1999), "b".repeat(10));
        let out = truncate_body(&body);
        assert!(out.starts_with(&"a".repeat(1999)));
        assert!(out.ends_with("...[truncated]"));
    }
}
