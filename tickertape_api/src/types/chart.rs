//! Wire types for the `v8/finance/chart` payload.
//!
//! Decoding never fails on a well-formed JSON document: every field is
//! optional, unknown fields are ignored, and a field of the wrong JSON type
//! reads as absent. Interpretation (which result, which quote, how to treat
//! gaps) belongs to the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChartResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub chart: Option<Chart>,
}

impl ChartResponse {
    /// Reads a decoded body. Anything that is not a chart object, including
    /// `null` or a bare string, yields an empty response.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The first entry of `chart.result`, if it is an object.
    pub fn first_result(&self) -> Option<&ChartResult> {
        self.chart.as_ref()?.result.as_ref()?.first()?.as_ref()
    }

    pub fn into_first_result(self) -> Option<ChartResult> {
        self.chart?.result?.into_iter().next()?
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Chart {
    /// Entries that are not objects are kept as `None` so positions hold.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub result: Option<Vec<Option<ChartResult>>>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<ChartError>,
}

/// Error object Yahoo embeds next to (or instead of) `result`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChartError {
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChartResult {
    #[serde(default, deserialize_with = "lenient")]
    pub meta: Option<ChartMeta>,
    /// Sample times in seconds since the Unix epoch. Entries that are not
    /// numbers are kept as `None`.
    #[serde(default, deserialize_with = "lenient_timestamps")]
    pub timestamp: Option<Vec<Option<i64>>>,
    #[serde(default, deserialize_with = "lenient")]
    pub indicators: Option<Indicators>,
}

impl ChartResult {
    pub fn timestamps(&self) -> &[Option<i64>] {
        self.timestamp.as_deref().unwrap_or_default()
    }

    /// Close prices of the first quote indicator, aligned with [`Self::timestamps`].
    pub fn closes(&self) -> &[Option<f64>] {
        self.indicators
            .as_ref()
            .and_then(|i| i.quote.as_ref())
            .and_then(|q| q.first())
            .and_then(|q| q.close.as_deref())
            .unwrap_or_default()
    }

    pub fn previous_close(&self) -> Option<f64> {
        self.meta.as_ref().and_then(|m| m.previous_close)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default, deserialize_with = "lenient")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub exchange_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub regular_market_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub previous_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub chart_previous_close: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Indicators {
    #[serde(default, deserialize_with = "lenient")]
    pub quote: Option<Vec<QuoteIndicator>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QuoteIndicator {
    /// Gaps arrive as `null`; anything that is not a JSON number is kept as `None`.
    #[serde(default, deserialize_with = "lenient_prices")]
    pub close: Option<Vec<Option<f64>>>,
}

/// Any JSON value; `None` when it does not decode as `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

/// An array read element by element; `None` when the value is not an array.
fn lenient_array<'de, D, T>(
    deserializer: D,
    item: impl Fn(Value) -> Option<T>,
) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(values) => Ok(Some(values.into_iter().map(item).collect())),
        _ => Ok(None),
    }
}

fn lenient_entries<'de, D>(deserializer: D) -> Result<Option<Vec<Option<ChartResult>>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_array(deserializer, |v| match v {
        Value::Object(_) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_timestamps<'de, D>(deserializer: D) -> Result<Option<Vec<Option<i64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_array(deserializer, |v| {
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        })
    })
}

fn lenient_prices<'de, D>(deserializer: D) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_array(deserializer, |v| v.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_accepts_nulls_and_junk() {
        let q: QuoteIndicator =
            serde_json::from_str(r#"{"close": [1.5, null, "x", 2, true]}"#).unwrap();
        assert_eq!(
            q.close.unwrap(),
            vec![Some(1.5), None, None, Some(2.0), None]
        );
    }

    #[test]
    fn close_null_is_absent() {
        let q: QuoteIndicator = serde_json::from_str(r#"{"close": null}"#).unwrap();
        assert!(q.close.is_none());
    }

    #[test]
    fn first_result_on_empty_shapes() {
        let empty: ChartResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.first_result().is_none());

        let null_result: ChartResponse =
            serde_json::from_str(r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#)
                .unwrap();
        assert!(null_result.first_result().is_none());
        assert_eq!(
            null_result.chart.unwrap().error.unwrap().code.as_deref(),
            Some("Not Found")
        );

        let no_entries: ChartResponse =
            serde_json::from_str(r#"{"chart": {"result": []}}"#).unwrap();
        assert!(no_entries.first_result().is_none());
    }

    #[test]
    fn wrong_shapes_read_as_absent() {
        for body in [
            r#""maintenance""#,
            r#"{"chart": "down"}"#,
            r#"{"chart": {"result": "oops"}}"#,
            r#"{"chart": {"result": [null]}}"#,
            r#"{"chart": {"result": [42, {"timestamp": [1]}]}}"#,
            "null",
            "[]",
        ] {
            let value: Value = serde_json::from_str(body).unwrap();
            let resp = ChartResponse::from_value(value);
            assert!(resp.first_result().is_none(), "body {body} should have no result");
        }
    }

    #[test]
    fn timestamps_keep_positions_of_bad_entries() {
        let r: ChartResult =
            serde_json::from_str(r#"{"timestamp": [1, null, 3.9, "x"]}"#).unwrap();
        assert_eq!(r.timestamps(), &[Some(1), None, Some(3), None]);

        let r: ChartResult = serde_json::from_str(r#"{"timestamp": "soon"}"#).unwrap();
        assert!(r.timestamps().is_empty());
    }

    #[test]
    fn mistyped_meta_fields_are_dropped_individually() {
        let r: ChartResult = serde_json::from_str(
            r#"{"meta": {"symbol": 7, "previousClose": 10.5, "currency": "USD"}}"#,
        )
        .unwrap();
        let meta = r.meta.unwrap();
        assert_eq!(meta.symbol, None);
        assert_eq!(meta.currency.as_deref(), Some("USD"));
        assert_eq!(meta.previous_close, Some(10.5));
    }

    #[test]
    fn accessors_default_to_empty() {
        let result = ChartResult::default();
        assert!(result.timestamps().is_empty());
        assert!(result.closes().is_empty());
        assert_eq!(result.previous_close(), None);
    }
}
