//! Display metadata for the symbols the driver cycles through.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A symbol plus how to present it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    pub symbol: String,
    pub label: String,
    /// Hex color, e.g. `#F7931A`.
    pub color: String,
}

impl Ticker {
    pub fn new(symbol: &str, label: &str, color: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }

    /// Parses `color` into RGB components, if it is a `#RRGGBB` string.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

#[derive(Deserialize, Debug)]
struct SeedFile {
    ticker: Vec<Ticker>,
}

/// Parse a ticker table from TOML (`[[ticker]]` entries).
pub fn parse_tickers(toml_content: &str) -> Result<Vec<Ticker>, ConfigError> {
    let seed_file: SeedFile = toml::from_str(toml_content)?;
    validate_tickers(&seed_file.ticker)?;
    Ok(seed_file.ticker)
}

/// Rejects an empty table, blank symbols, and duplicate symbols.
pub fn validate_tickers(tickers: &[Ticker]) -> Result<(), ConfigError> {
    if tickers.is_empty() {
        return Err(ConfigError::Invalid("ticker table is empty".to_string()));
    }
    for (i, t) in tickers.iter().enumerate() {
        if t.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "ticker #{} has an empty symbol",
                i + 1
            )));
        }
        if t.symbol.trim() != t.symbol {
            return Err(ConfigError::Invalid(format!(
                "ticker symbol '{}' has surrounding whitespace",
                t.symbol
            )));
        }
        if tickers[..i].iter().any(|prev| prev.symbol == t.symbol) {
            return Err(ConfigError::Invalid(format!(
                "duplicate ticker symbol '{}'",
                t.symbol
            )));
        }
    }
    Ok(())
}

/// Load the built-in ticker table.
///
/// The TOML file is included at compile time via include_str!.
pub fn default_tickers() -> Vec<Ticker> {
    let toml_content = include_str!("../../seed_data/tickers.toml");
    match parse_tickers(toml_content) {
        Ok(tickers) => tickers,
        Err(e) => {
            tracing::error!("Built-in ticker table is invalid: {}", e);
            vec![Ticker::new("BTC-USD", "Bitcoin", "#F7931A")]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_display_order() {
        let tickers = default_tickers();
        let symbols: Vec<&str> = tickers.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(
            symbols,
            vec!["BTC-USD", "ETH-USD", "^GSPC", "^NDX", "NVDA", "SOFI"]
        );
        assert_eq!(tickers[2].label, "S&P 500");
        assert_eq!(tickers[0].color, "#F7931A");
    }

    #[test]
    fn rgb_parses_hex() {
        let t = Ticker::new("NVDA", "NVIDIA", "#76B900");
        assert_eq!(t.rgb(), Some((0x76, 0xB9, 0x00)));

        let bad = Ticker::new("X", "X", "green");
        assert_eq!(bad.rgb(), None);
    }

    #[test]
    fn parse_rejects_empty_table() {
        let err = parse_tickers("ticker = []").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn parse_rejects_duplicates() {
        let toml = r##"
            [[ticker]]
            symbol = "NVDA"
            label = "NVIDIA"
            color = "#76B900"

            [[ticker]]
            symbol = "NVDA"
            label = "Again"
            color = "#000000"
        "##;
        let err = parse_tickers(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn parse_rejects_padded_symbol() {
        let toml = r##"
            [[ticker]]
            symbol = " NVDA"
            label = "NVIDIA"
            color = "#76B900"
        "##;
        let err = parse_tickers(toml).unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn parse_rejects_malformed_toml() {
        assert!(matches!(
            parse_tickers("[[ticker]\nsymbol ="),
            Err(ConfigError::Toml(_))
        ));
    }
}
