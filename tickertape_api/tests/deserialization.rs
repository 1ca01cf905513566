use tickertape_api::types::ChartResponse;

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_chart_full() {
    let json = load_fixture("chart_nvda.json");
    let resp: ChartResponse = serde_json::from_str(&json).unwrap();

    let result = resp.first_result().unwrap();
    assert_eq!(result.timestamps().len(), 5);
    assert_eq!(result.timestamps()[0], Some(1718352000));
    assert_eq!(
        result.closes(),
        &[Some(130.05), Some(130.44), None, Some(130.92), Some(131.88)]
    );
    assert_eq!(result.previous_close(), Some(129.61));

    let meta = result.meta.as_ref().unwrap();
    assert_eq!(meta.symbol.as_deref(), Some("NVDA"));
    assert_eq!(meta.currency.as_deref(), Some("USD"));
    assert_eq!(meta.exchange_name.as_deref(), Some("NMS"));
    assert_eq!(meta.regular_market_price, Some(131.88));
    assert_eq!(meta.chart_previous_close, Some(129.61));
}

#[test]
fn deserialize_chart_not_found() {
    let json = load_fixture("chart_not_found.json");
    let resp: ChartResponse = serde_json::from_str(&json).unwrap();
    assert!(resp.first_result().is_none());

    let error = resp.chart.unwrap().error.unwrap();
    assert_eq!(error.code.as_deref(), Some("Not Found"));
    assert!(error.description.unwrap().contains("delisted"));
}

#[test]
fn deserialize_chart_minimal() {
    let json = load_fixture("chart_minimal.json");
    let resp: ChartResponse = serde_json::from_str(&json).unwrap();

    let result = resp.first_result().unwrap();
    assert!(result.timestamps().is_empty());
    assert!(result.closes().is_empty());
    assert_eq!(result.previous_close(), None);
}

#[test]
fn deserialize_chart_wrong_types_read_as_absent() {
    let json = r#"{"chart": {"result": [{"timestamp": "soon", "meta": "n/a"}]}}"#;
    let resp: ChartResponse = serde_json::from_str(json).unwrap();
    let result = resp.first_result().unwrap();
    assert!(result.timestamps().is_empty());
    assert!(result.meta.is_none());
}

#[test]
fn deserialize_chart_null_timestamp_keeps_alignment() {
    let json = r#"{"chart": {"result": [{
        "timestamp": [1, null, 3],
        "indicators": {"quote": [{"close": [1.0, 2.0, 3.0]}]}
    }]}}"#;
    let resp: ChartResponse = serde_json::from_str(json).unwrap();
    let result = resp.first_result().unwrap();
    assert_eq!(result.timestamps(), &[Some(1), None, Some(3)]);
    assert_eq!(result.closes().len(), 3);
}

#[test]
fn into_first_result_takes_only_the_first() {
    let json = r#"{"chart": {"result": [
        {"timestamp": [1]},
        {"timestamp": [2, 3]}
    ]}}"#;
    let resp: ChartResponse = serde_json::from_str(json).unwrap();
    let first = resp.into_first_result().unwrap();
    assert_eq!(first.timestamps(), &[Some(1)]);
}
