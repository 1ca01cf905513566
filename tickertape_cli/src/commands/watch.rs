//! The `watch` subcommand: run the display driver in the terminal.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Args;
use tickertape_lib::{DisplayDriver, Settings};

use crate::output::{format_ticker_line, print_json, OutputFormat};

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds each ticker stays on screen: 2, 3, 5, 7, 10 or 15
    #[arg(long)]
    pub rotate: Option<u64>,

    /// Seconds between refreshes of every ticker in the rotation
    #[arg(long)]
    pub refresh: Option<u64>,

    /// Comma-separated subset of the ticker table to rotate through
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

pub async fn run(args: &WatchArgs, mut settings: Settings, format: &OutputFormat) -> Result<()> {
    if let Some(rotate) = args.rotate {
        settings.rotate_seconds = rotate;
    }
    if let Some(refresh) = args.refresh {
        settings.refresh_seconds = refresh;
    }
    settings.validate().context("invalid watch options")?;

    let driver = DisplayDriver::from_settings(settings)?;
    if !args.symbols.is_empty() {
        let symbols: Vec<String> = args.symbols.iter().map(|s| s.trim().to_string()).collect();
        driver.select(&symbols)?;
    }

    let mut active = driver.subscribe();
    driver.start()?;
    tracing::info!(
        "Rotating every {}s, refreshing every {}s (Ctrl-C to stop)",
        driver.rotate_seconds(),
        driver.settings().refresh_seconds
    );

    let color = matches!(format, OutputFormat::Table) && std::io::stdout().is_terminal();
    render(&driver, format, color);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = active.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&driver, format, color);
            }
        }
    }

    driver.shutdown();
    Ok(())
}

fn render(driver: &DisplayDriver, format: &OutputFormat, color: bool) {
    let Some(view) = driver.active_view() else {
        return;
    };
    match format {
        OutputFormat::Json => print_json(&view),
        _ => println!("{}", format_ticker_line(&view, driver.is_loading(), color)),
    }
}
