//! Which ticker is on screen, and which ones are in the rotation.

use crate::error::DriverError;
use crate::tickers::Ticker;

/// Rotation over a fixed ticker table.
///
/// An empty selection means "everything": the display never runs out of
/// tickers to show.
#[derive(Debug, Clone)]
pub struct Rotation {
    tickers: Vec<Ticker>,
    selected: Vec<String>,
    index: usize,
}

impl Rotation {
    /// Starts with every ticker selected and the first one active.
    pub fn new(tickers: Vec<Ticker>) -> Self {
        let selected = tickers.iter().map(|t| t.symbol.clone()).collect();
        Self {
            tickers,
            selected,
            index: 0,
        }
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn find(&self, symbol: &str) -> Option<&Ticker> {
        self.tickers.iter().find(|t| t.symbol == symbol)
    }

    /// Selected tickers in table order, or the whole table when nothing is selected.
    pub fn active_tickers(&self) -> Vec<&Ticker> {
        if self.selected.is_empty() {
            return self.tickers.iter().collect();
        }
        self.tickers
            .iter()
            .filter(|t| self.selected.contains(&t.symbol))
            .collect()
    }

    pub fn active(&self) -> Option<&Ticker> {
        let active = self.active_tickers();
        if active.is_empty() {
            return None;
        }
        Some(active[self.index % active.len()])
    }

    /// Moves to the next active ticker, wrapping at the end.
    pub fn advance(&mut self) {
        let len = self.active_tickers().len().max(1);
        self.index = (self.index + 1) % len;
    }

    /// Adds `symbol` to the selection, or removes it if already selected.
    /// Returns whether it is selected afterwards.
    pub fn toggle(&mut self, symbol: &str) -> Result<bool, DriverError> {
        if self.find(symbol).is_none() {
            return Err(DriverError::UnknownSymbol(symbol.to_string()));
        }
        let now_selected = if let Some(pos) = self.selected.iter().position(|s| s == symbol) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(symbol.to_string());
            true
        };
        self.clamp();
        Ok(now_selected)
    }

    /// Replaces the selection. Every symbol must be in the table.
    pub fn select(&mut self, symbols: &[String]) -> Result<(), DriverError> {
        if let Some(unknown) = symbols.iter().find(|s| self.find(s).is_none()) {
            return Err(DriverError::UnknownSymbol(unknown.clone()));
        }
        self.selected = Vec::with_capacity(symbols.len());
        for s in symbols {
            if !self.selected.contains(s) {
                self.selected.push(s.clone());
            }
        }
        self.clamp();
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selected = self.tickers.iter().map(|t| t.symbol.clone()).collect();
        self.clamp();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.clamp();
    }

    /// Symbols the refresh schedule should fetch.
    pub fn refresh_targets(&self) -> Vec<String> {
        if self.selected.is_empty() {
            self.tickers.iter().map(|t| t.symbol.clone()).collect()
        } else {
            self.selected.clone()
        }
    }

    fn clamp(&mut self) {
        if self.index >= self.active_tickers().len() {
            self.index = 0;
        }
    }
}
