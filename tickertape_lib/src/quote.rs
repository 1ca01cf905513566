//! Quote request/result types and the chart normalization step.

use serde::{Deserialize, Serialize};
use tickertape_api::types::ChartResult;
use tickertape_api::{ChartInterval, ChartQuery, ChartRange};

/// What to fetch for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: String,
    pub range: ChartRange,
    pub interval: ChartInterval,
    pub include_pre_post: bool,
}

impl QuoteRequest {
    /// Intraday defaults: `1d` at `1m`, pre/post market included.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            range: ChartRange::default(),
            interval: ChartInterval::default(),
            include_pre_post: true,
        }
    }

    pub fn with_range(mut self, range: ChartRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_interval(mut self, interval: ChartInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_pre_post(mut self, include_pre_post: bool) -> Self {
        self.include_pre_post = include_pre_post;
        self
    }

    pub fn to_query(&self) -> ChartQuery {
        ChartQuery::default()
            .with_range(self.range)
            .with_interval(self.interval)
            .with_pre_post(self.include_pre_post)
    }
}

/// One sample of the intraday series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Milliseconds since the Unix epoch.
    pub x: i64,
    pub y: f64,
}

/// Normalized outcome of one fetch. Replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub points: Vec<SeriesPoint>,
    /// Price of the final retained point; `None` when no point survived.
    pub last: Option<f64>,
    /// Percent change against `previous_close`, or `0.0` when either side
    /// is unavailable (indistinguishable from "unchanged"; check
    /// `previous_close` to tell them apart).
    pub change_pct: f64,
    pub previous_close: Option<f64>,
}

impl QuoteResult {
    /// Builds a result from the first chart entry.
    ///
    /// Timestamps and closes are zipped, stopping at the shorter array.
    /// Points without a timestamp or a finite close are dropped; order is
    /// preserved.
    pub fn from_chart(result: &ChartResult) -> Self {
        let points: Vec<SeriesPoint> = result
            .timestamps()
            .iter()
            .zip(result.closes())
            .filter_map(|(&t, &close)| match (t, close) {
                (Some(t), Some(y)) if y.is_finite() => Some(SeriesPoint {
                    x: t.saturating_mul(1000),
                    y,
                }),
                _ => None,
            })
            .collect();

        let last = points.last().map(|p| p.y);
        let previous_close = result.previous_close();

        Self {
            change_pct: change_pct(last, previous_close),
            points,
            last,
            previous_close,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// `(last - previous_close) / previous_close * 100`, or `0.0` when either
/// input is missing or the reference is zero.
pub fn change_pct(last: Option<f64>, previous_close: Option<f64>) -> f64 {
    match (last, previous_close) {
        (Some(last), Some(prev)) if prev != 0.0 && prev.is_finite() => {
            (last - prev) / prev * 100.0
        }
        _ => 0.0,
    }
}
