use anyhow::Result;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tickertape_lib::{QuoteResult, SeriesPoint, TickerView};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

const SPARK_WIDTH: usize = 40;
const UP_RGB: (u8, u8, u8) = (0x00, 0xE6, 0x76);
const DOWN_RGB: (u8, u8, u8) = (0xFF, 0x52, 0x52);

#[derive(Tabled, Serialize)]
struct QuoteRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Last")]
    #[serde(rename = "Last")]
    last: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Prev Close")]
    #[serde(rename = "Prev Close")]
    previous_close: String,
    #[tabled(rename = "Points")]
    #[serde(rename = "Points")]
    points: usize,
    #[tabled(rename = "Chart")]
    #[serde(rename = "Chart")]
    chart: String,
}

#[derive(Serialize)]
struct PointRow {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Price")]
    price: f64,
}

// -- Row builders --

fn build_quote_row(symbol: &str, result: &QuoteResult) -> QuoteRow {
    QuoteRow {
        symbol: symbol.to_string(),
        last: result
            .last
            .map(format_price)
            .unwrap_or_else(|| "N/A".to_string()),
        change: format_change(result.change_pct),
        previous_close: result
            .previous_close
            .map(format_price)
            .unwrap_or_else(|| "-".to_string()),
        points: result.points.len(),
        chart: sparkline(&result.points, SPARK_WIDTH),
    }
}

fn build_point_rows(points: &[SeriesPoint]) -> Vec<PointRow> {
    points
        .iter()
        .map(|p| PointRow {
            time: format_timestamp(p.x),
            price: p.y,
        })
        .collect()
}

// -- Quote output --

pub fn print_quote_table(symbol: &str, result: &QuoteResult) {
    println!("{}", Table::new(vec![build_quote_row(symbol, result)]));
}

pub fn print_quote_markdown(symbol: &str, result: &QuoteResult) {
    let mut table = Table::new(vec![build_quote_row(symbol, result)]);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_quote_csv(result: &QuoteResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_point_rows(&result.points) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Watch output --

/// One line for the ticker on screen: label, symbol, price, change, chart.
///
/// Price shows `—` while the first load is still running and `N/A` once it
/// has finished without a price for this symbol.
pub fn format_ticker_line(view: &TickerView, loading: bool, color: bool) -> String {
    let result = view.quote.as_ref().map(|q| &q.result);

    let price = match result.and_then(|r| r.last) {
        Some(last) if last != 0.0 => format_price(last),
        _ if loading => "—".to_string(),
        _ => "N/A".to_string(),
    };
    let change = result
        .map(|r| format_change(r.change_pct))
        .unwrap_or_default();
    let chart = result
        .map(|r| sparkline(&r.points, SPARK_WIDTH))
        .unwrap_or_default();

    let label = match (color, view.ticker.rgb()) {
        (true, Some(rgb)) => paint(&view.ticker.label, rgb),
        _ => view.ticker.label.clone(),
    };
    let change = match (color, result) {
        (true, Some(r)) => paint(&change, if r.change_pct >= 0.0 { UP_RGB } else { DOWN_RGB }),
        _ => change,
    };

    format!(
        "{}  {}  {}  {}  {}",
        label, view.ticker.symbol, price, change, chart
    )
    .trim_end()
    .to_string()
}

fn paint(text: &str, (r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, text)
}

// -- Formatting helpers --

/// Thousands separators, at most two decimals, trailing zeros dropped.
fn format_price(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

fn format_change(pct: f64) -> String {
    format!("{:.2}%", pct)
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

/// Unicode block sparkline of at most `width` samples, evenly picked and
/// always including the first and last point.
fn sparkline(points: &[SeriesPoint], width: usize) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    if points.is_empty() || width == 0 {
        return String::new();
    }
    let n = points.len().min(width);
    let sampled: Vec<f64> = if n == 1 {
        vec![points[points.len() - 1].y]
    } else {
        (0..n)
            .map(|i| points[i * (points.len() - 1) / (n - 1)].y)
            .collect()
    };

    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    sampled
        .iter()
        .map(|&y| {
            if span <= 0.0 {
                BARS[3]
            } else {
                let idx = ((y - min) / span * 7.0).round() as usize;
                BARS[idx.min(7)]
            }
        })
        .collect()
}
