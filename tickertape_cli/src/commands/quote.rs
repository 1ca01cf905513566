//! The `quote` subcommand: one fetch, printed once.

use anyhow::Result;
use clap::Args;
use tickertape_lib::{ChartInterval, ChartRange, QuoteFetcher, Settings};

use crate::output::{
    print_json, print_quote_csv, print_quote_markdown, print_quote_table, OutputFormat,
};

#[derive(Args)]
pub struct QuoteArgs {
    /// Ticker symbol (e.g. BTC-USD, ^GSPC, NVDA)
    pub symbol: String,

    /// History range: 1d, 5d, 1mo, 3mo, 6mo, 1y (defaults to the configured range)
    #[arg(long)]
    pub range: Option<ChartRange>,

    /// Sample interval: 1m, 2m, 5m, 15m, 1h, 1d (defaults to the configured interval)
    #[arg(long)]
    pub interval: Option<ChartInterval>,

    /// Exclude pre- and post-market samples
    #[arg(long)]
    pub no_pre_post: bool,
}

pub async fn run(args: &QuoteArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let fetcher = QuoteFetcher::with_options(&settings.base_url, settings.timeout())?;

    let mut request = settings.request_for(args.symbol.trim());
    if let Some(range) = args.range {
        request = request.with_range(range);
    }
    if let Some(interval) = args.interval {
        request = request.with_interval(interval);
    }
    if args.no_pre_post {
        request = request.with_pre_post(false);
    }

    let result = fetcher.fetch(&request).await?;

    eprintln!(
        "{} ({} {}, {} points)",
        request.symbol,
        request.range,
        request.interval,
        result.points.len()
    );

    match format {
        OutputFormat::Table => print_quote_table(&request.symbol, &result),
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => print_quote_csv(&result)?,
        OutputFormat::Markdown => print_quote_markdown(&request.symbol, &result),
    }

    Ok(())
}
