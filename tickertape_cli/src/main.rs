mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tickertape_lib::Settings;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "tickertape")]
#[command(about = "Rotating price display for crypto, indices and equities")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TOML settings file (rotation, refresh, tickers, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the quotes API host (e.g. a local mock)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one symbol and print its latest price and intraday series
    Quote(commands::quote::QuoteArgs),
    /// Cycle through the ticker table, refreshing prices in the background
    Watch(commands::watch::WatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tickertape=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }

    match &cli.command {
        Commands::Quote(args) => commands::quote::run(args, &settings, &format).await?,
        Commands::Watch(args) => commands::watch::run(args, settings, &format).await?,
    }

    Ok(())
}
