use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tickertape_lib::types::ChartResponse;
use tickertape_lib::{QuoteResult, StoredQuote, Ticker, TickerView};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_fixture_result(name: &str) -> QuoteResult {
    let path = workspace_root()
        .join("tickertape_api/tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    let resp: ChartResponse = serde_json::from_str(&text).expect("fixture is a chart response");
    QuoteResult::from_chart(resp.first_result().expect("fixture has a result"))
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn nvda_json() -> Value {
    serde_json::to_value(load_fixture_result("chart_nvda.json")).unwrap()
}

// ---------------------------------------------------------------------------
// Positive validation: serialized output conforms to its schema
// ---------------------------------------------------------------------------

#[test]
fn test_quote_result_conforms_to_schema() {
    let schema = load_schema("quote_result.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("quote schema compiles");
    if let Err(e) = validator.validate(&nvda_json()) {
        panic!("quote result failed validation: {e}");
    }
}

#[test]
fn test_empty_quote_result_conforms_to_schema() {
    let schema = load_schema("quote_result.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("quote schema compiles");
    let data = serde_json::to_value(load_fixture_result("chart_minimal.json")).unwrap();
    if let Err(e) = validator.validate(&data) {
        panic!("minimal quote result failed validation: {e}");
    }
}

#[test]
fn test_ticker_view_conforms_to_schema() {
    let schema = load_schema("ticker_view.schema.json");
    let validator = jsonschema::draft202012::new(&schema).expect("view schema compiles");

    let loaded = TickerView {
        ticker: Ticker::new("NVDA", "NVIDIA", "#76B900"),
        quote: Some(StoredQuote {
            seq: 3,
            result: load_fixture_result("chart_nvda.json"),
            updated_at: chrono::Utc::now(),
        }),
    };
    let pending = TickerView {
        ticker: Ticker::new("SOFI", "SoFi", "#2EC4F1"),
        quote: None,
    };

    for view in [loaded, pending] {
        let data = serde_json::to_value(&view).unwrap();
        if let Err(e) = validator.validate(&data) {
            panic!("ticker view {} failed validation: {e}", view.ticker.symbol);
        }
    }
}

// ---------------------------------------------------------------------------
// Negative validation: schemas reject invalid data
// ---------------------------------------------------------------------------

#[test]
fn test_quote_schema_rejects_missing_points() {
    let schema = load_schema("quote_result.schema.json");
    let validator = jsonschema::draft202012::new(&schema).unwrap();

    let mut data = nvda_json();
    data.as_object_mut().unwrap().remove("points");
    assert!(!validator.is_valid(&data));
}

#[test]
fn test_quote_schema_rejects_string_price() {
    let schema = load_schema("quote_result.schema.json");
    let validator = jsonschema::draft202012::new(&schema).unwrap();

    let mut data = nvda_json();
    data["points"][0]["y"] = json!("130.05");
    assert!(!validator.is_valid(&data));
}

#[test]
fn test_quote_schema_rejects_fractional_timestamp() {
    let schema = load_schema("quote_result.schema.json");
    let validator = jsonschema::draft202012::new(&schema).unwrap();

    let mut data = nvda_json();
    data["points"][0]["x"] = json!(1718352000000.5);
    assert!(!validator.is_valid(&data));
}

#[test]
fn test_view_schema_rejects_bad_color() {
    let schema = load_schema("ticker_view.schema.json");
    let validator = jsonschema::draft202012::new(&schema).unwrap();

    let data = json!({
        "ticker": {"symbol": "NVDA", "label": "NVIDIA", "color": "green"},
        "quote": null
    });
    assert!(!validator.is_valid(&data));
}
