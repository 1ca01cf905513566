use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{common::ParseQueryError, Query};

/// Parameters for `/v8/finance/chart/{symbol}`.
///
/// Range and interval are passed through verbatim. Their compatibility
/// (e.g. `1y` at `1m`) is left to the upstream API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartQuery {
    pub range: ChartRange,
    pub interval: ChartInterval,
    pub include_pre_post: bool,
}

impl Default for ChartQuery {
    fn default() -> Self {
        Self {
            range: ChartRange::default(),
            interval: ChartInterval::default(),
            include_pre_post: true,
        }
    }
}

impl Query for ChartQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("range", &self.range.to_string())
            .append_pair("interval", &self.interval.to_string())
            .append_pair(
                "includePrePost",
                if self.include_pre_post { "true" } else { "false" },
            );
        url
    }
}

impl ChartQuery {
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
}

/// How much history to request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartRange {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl ChartRange {
    const EXPECTED: &'static str = "1d, 5d, 1mo, 3mo, 6mo, 1y";
}

impl std::fmt::Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChartRange::OneDay => "1d",
                ChartRange::FiveDays => "5d",
                ChartRange::OneMonth => "1mo",
                ChartRange::ThreeMonths => "3mo",
                ChartRange::SixMonths => "6mo",
                ChartRange::OneYear => "1y",
            }
        )
    }
}

impl FromStr for ChartRange {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(ChartRange::OneDay),
            "5d" => Ok(ChartRange::FiveDays),
            "1mo" => Ok(ChartRange::OneMonth),
            "3mo" => Ok(ChartRange::ThreeMonths),
            "6mo" => Ok(ChartRange::SixMonths),
            "1y" => Ok(ChartRange::OneYear),
            _ => Err(ParseQueryError {
                kind: "range",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Sampling granularity of the returned series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    #[default]
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl ChartInterval {
    const EXPECTED: &'static str = "1m, 2m, 5m, 15m, 1h, 1d";
}

impl std::fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChartInterval::OneMinute => "1m",
                ChartInterval::TwoMinutes => "2m",
                ChartInterval::FiveMinutes => "5m",
                ChartInterval::FifteenMinutes => "15m",
                ChartInterval::OneHour => "1h",
                ChartInterval::OneDay => "1d",
            }
        )
    }
}

impl FromStr for ChartInterval {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(ChartInterval::OneMinute),
            "2m" => Ok(ChartInterval::TwoMinutes),
            "5m" => Ok(ChartInterval::FiveMinutes),
            "15m" => Ok(ChartInterval::FifteenMinutes),
            "1h" => Ok(ChartInterval::OneHour),
            "1d" => Ok(ChartInterval::OneDay),
            _ => Err(ParseQueryError {
                kind: "interval",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{ChartInterval, ChartQuery, ChartRange, Query};

    #[test]
    fn test_chart_query() {
        let url = Url::parse("https://example.com/v8/finance/chart/NVDA").unwrap();

        insta::assert_snapshot!(
            ChartQuery::default().add_to_url(&url).to_string(),
            @"https://example.com/v8/finance/chart/NVDA?range=1d&interval=1m&includePrePost=true"
        );

        insta::assert_snapshot!(
            ChartQuery::default()
                .with_range(ChartRange::SixMonths)
                .with_interval(ChartInterval::OneHour)
                .with_pre_post(false)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/v8/finance/chart/NVDA?range=6mo&interval=1h&includePrePost=false"
        );
    }

    #[test]
    fn test_range_round_trips_through_display() {
        for range in [
            ChartRange::OneDay,
            ChartRange::FiveDays,
            ChartRange::OneMonth,
            ChartRange::ThreeMonths,
            ChartRange::SixMonths,
            ChartRange::OneYear,
        ] {
            assert_eq!(range.to_string().parse::<ChartRange>().unwrap(), range);
        }
    }

    #[test]
    fn test_unknown_interval_rejected() {
        let err = "90m".parse::<ChartInterval>().unwrap_err();
        assert_eq!(err.kind, "interval");
        assert!(err.to_string().contains("90m"));
        assert!(err.to_string().contains("15m"));
    }
}
