//! Display driver: keeps the store fresh and decides what is on screen.
//!
//! Composes a [`QuoteFetcher`], a [`QuoteStore`], a [`Rotation`] and two
//! independent [`Schedule`]s (rotate, refresh). Renderers hold a clone of
//! the driver and read through [`DisplayDriver::active_view`] or subscribe
//! to rotations with [`DisplayDriver::subscribe`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::{validate_rotate_seconds, Settings};
use crate::error::{DriverError, FetchError};
use crate::fetcher::QuoteFetcher;
use crate::rotation::Rotation;
use crate::schedule::{Schedule, ScheduleHandle};
use crate::store::{CommitOutcome, QuoteStore, StoredQuote};
use crate::tickers::Ticker;

/// Result of one [`DisplayDriver::load`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// The new result is in the store.
    Stored,
    /// A newer result was already stored; this one was discarded.
    Superseded,
    /// The driver has shut down; nothing was written.
    Closed,
    /// The fetch failed and the previous value (if any) was left in place.
    KeptPrevious(FetchError),
}

/// Counts from one [`DisplayDriver::refresh_all`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub applied: usize,
    pub stale: usize,
    pub failed: usize,
    pub closed: usize,
}

impl RefreshSummary {
    fn record(&mut self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Stored => self.applied += 1,
            LoadOutcome::Superseded => self.stale += 1,
            LoadOutcome::Closed => self.closed += 1,
            LoadOutcome::KeptPrevious(_) => self.failed += 1,
        }
    }
}

/// What a renderer needs for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerView {
    pub ticker: Ticker,
    /// `None` until the first successful fetch.
    pub quote: Option<StoredQuote>,
}

struct Timers {
    rotate: Option<ScheduleHandle>,
    refresh: Option<ScheduleHandle>,
}

struct DriverInner {
    fetcher: QuoteFetcher,
    store: Arc<QuoteStore>,
    settings: Settings,
    rotation: Mutex<Rotation>,
    rotate_secs: Mutex<u64>,
    timers: Mutex<Timers>,
    active_tx: watch::Sender<Option<Ticker>>,
    /// Cleared once the first load finishes, successful or not.
    loading: AtomicBool,
}

/// Cheap-to-clone handle to a running display.
#[derive(Clone)]
pub struct DisplayDriver {
    inner: Arc<DriverInner>,
}

impl DisplayDriver {
    pub fn new(fetcher: QuoteFetcher, settings: Settings) -> Self {
        let rotation = Rotation::new(settings.tickers.clone());
        let (active_tx, _) = watch::channel(rotation.active().cloned());
        Self {
            inner: Arc::new(DriverInner {
                fetcher,
                store: Arc::new(QuoteStore::new()),
                rotate_secs: Mutex::new(settings.rotate_seconds),
                settings,
                rotation: Mutex::new(rotation),
                timers: Mutex::new(Timers {
                    rotate: None,
                    refresh: None,
                }),
                active_tx,
                loading: AtomicBool::new(true),
            }),
        }
    }

    /// Builds the fetcher from `settings.base_url` and `settings.timeout_secs`.
    pub fn from_settings(settings: Settings) -> Result<Self, FetchError> {
        let fetcher = QuoteFetcher::with_options(&settings.base_url, settings.timeout())?;
        Ok(Self::new(fetcher, settings))
    }

    /// Shared handle to the store, for renderers.
    pub fn store(&self) -> Arc<QuoteStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// Kicks off the initial load of every ticker (selected or not), then
    /// starts the rotate and refresh schedules. Must be called from within a
    /// tokio runtime.
    pub fn start(&self) -> Result<(), DriverError> {
        let symbols: Vec<String> = self
            .rotation()
            .tickers()
            .iter()
            .map(|t| t.symbol.clone())
            .collect();
        tracing::info!("Initial load of {} tickers", symbols.len());
        let driver = self.clone();
        tokio::spawn(async move {
            let summary = driver.load_many(symbols).await;
            tracing::info!("Initial load finished: {:?}", summary);
        });

        self.start_schedules()
    }

    /// Starts only the rotate and refresh schedules. Calling it again
    /// replaces the running ones.
    pub fn start_schedules(&self) -> Result<(), DriverError> {
        let rotate = self.start_rotate(Duration::from_secs(self.rotate_seconds()))?;
        let refresh = {
            let driver = self.clone();
            Schedule::start("refresh", self.inner.settings.refresh_period(), move || {
                // Spawned so a slow upstream never holds up the next tick.
                let driver = driver.clone();
                tokio::spawn(async move {
                    let summary = driver.refresh_all().await;
                    tracing::debug!("Refresh finished: {:?}", summary);
                });
                std::future::ready(())
            })?
        };

        let mut timers = self.timers();
        timers.rotate = Some(rotate);
        timers.refresh = Some(refresh);
        Ok(())
    }

    fn start_rotate(&self, period: Duration) -> Result<ScheduleHandle, DriverError> {
        let driver = self.clone();
        Schedule::start("rotate", period, move || {
            driver.advance();
            std::future::ready(())
        })
    }

    /// Fetches one symbol and stores the result.
    ///
    /// Failures follow the keep-last-good policy: the error is logged and
    /// returned in [`LoadOutcome::KeptPrevious`], and the store is left
    /// exactly as it was. A failed refresh never clears what is on screen.
    pub async fn load(&self, symbol: &str) -> LoadOutcome {
        let ticket = self.inner.store.begin(symbol);
        let request = self.inner.settings.request_for(symbol);
        let outcome = match self.inner.fetcher.fetch(&request).await {
            Ok(result) => match self.inner.store.commit(ticket, result) {
                CommitOutcome::Applied => LoadOutcome::Stored,
                CommitOutcome::Stale => LoadOutcome::Superseded,
                CommitOutcome::Closed => LoadOutcome::Closed,
            },
            Err(e) => keep_last_good(symbol, e),
        };
        self.inner.loading.store(false, Ordering::Release);
        outcome
    }

    /// True until the first load has finished. Renderers use it to tell
    /// "not fetched yet" from "fetched, but no price".
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire)
    }

    /// Refreshes every symbol in the current rotation concurrently and waits
    /// for all of them.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let targets = self.rotation().refresh_targets();
        self.load_many(targets).await
    }

    async fn load_many(&self, symbols: Vec<String>) -> RefreshSummary {
        let mut set = JoinSet::new();
        for symbol in symbols {
            let driver = self.clone();
            set.spawn(async move { driver.load(&symbol).await });
        }

        let mut summary = RefreshSummary::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    tracing::error!("Load task panicked or was cancelled: {}", e);
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    /// Moves to the next ticker and notifies subscribers.
    pub fn advance(&self) {
        let active = {
            let mut rotation = self.rotation();
            rotation.advance();
            rotation.active().cloned()
        };
        self.publish(active);
    }

    /// Receives the active ticker every time it changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Ticker>> {
        self.inner.active_tx.subscribe()
    }

    pub fn active_ticker(&self) -> Option<Ticker> {
        self.rotation().active().cloned()
    }

    pub fn active_view(&self) -> Option<TickerView> {
        let ticker = self.active_ticker()?;
        Some(self.view_of(ticker))
    }

    pub fn view(&self, symbol: &str) -> Option<TickerView> {
        let ticker = self.rotation().find(symbol).cloned()?;
        Some(self.view_of(ticker))
    }

    fn view_of(&self, ticker: Ticker) -> TickerView {
        let quote = self.inner.store.get(&ticker.symbol);
        TickerView { ticker, quote }
    }

    pub fn rotate_seconds(&self) -> u64 {
        *self
            .inner
            .rotate_secs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Changes the rotation period. Only the values in
    /// [`crate::config::ROTATE_CHOICES`] are accepted. A running rotate
    /// schedule is restarted with the new period.
    pub fn set_rotate_seconds(&self, secs: u64) -> Result<(), DriverError> {
        validate_rotate_seconds(secs)?;
        *self
            .inner
            .rotate_secs
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = secs;
        self.restart_rotate()?;
        tracing::info!("Rotation interval set to {}s", secs);
        Ok(())
    }

    pub fn toggle_symbol(&self, symbol: &str) -> Result<bool, DriverError> {
        self.change_selection(|rotation| rotation.toggle(symbol))
    }

    pub fn select(&self, symbols: &[String]) -> Result<(), DriverError> {
        self.change_selection(|rotation| rotation.select(symbols))
    }

    pub fn select_all(&self) -> Result<(), DriverError> {
        self.change_selection(|rotation| {
            rotation.select_all();
            Ok(())
        })
    }

    pub fn clear_selection(&self) -> Result<(), DriverError> {
        self.change_selection(|rotation| {
            rotation.clear();
            Ok(())
        })
    }

    /// Applies a selection change and republishes the active ticker. When
    /// the number of active tickers changes, a running rotate schedule
    /// starts a fresh period.
    fn change_selection<T>(
        &self,
        change: impl FnOnce(&mut Rotation) -> Result<T, DriverError>,
    ) -> Result<T, DriverError> {
        let (out, active, resized) = {
            let mut rotation = self.rotation();
            let before = rotation.active_tickers().len();
            let out = change(&mut rotation)?;
            let resized = rotation.active_tickers().len() != before;
            (out, rotation.active().cloned(), resized)
        };
        if resized {
            self.restart_rotate()?;
        }
        self.publish(active);
        Ok(out)
    }

    /// Replaces a running rotate schedule with one on the current period.
    fn restart_rotate(&self) -> Result<(), DriverError> {
        let mut timers = self.timers();
        if let Some(mut old) = timers.rotate.take() {
            old.stop();
            let period = Duration::from_secs(self.rotate_seconds());
            timers.rotate = Some(self.start_rotate(period)?);
        }
        Ok(())
    }

    pub fn selected(&self) -> Vec<String> {
        self.rotation().selected().to_vec()
    }

    pub fn is_running(&self) -> bool {
        let timers = self.timers();
        timers.rotate.as_ref().is_some_and(|t| t.is_running())
            || timers.refresh.as_ref().is_some_and(|t| t.is_running())
    }

    /// Stops both schedules and closes the store. Fetches already in flight
    /// are not cancelled; their results are rejected when they arrive.
    pub fn shutdown(&self) {
        {
            let mut timers = self.timers();
            if let Some(mut t) = timers.rotate.take() {
                t.stop();
            }
            if let Some(mut t) = timers.refresh.take() {
                t.stop();
            }
        }
        self.inner.store.close();
        tracing::info!("Display driver shut down");
    }

    fn publish(&self, active: Option<Ticker>) {
        self.inner.active_tx.send_replace(active);
    }

    fn rotation(&self) -> MutexGuard<'_, Rotation> {
        self.inner
            .rotation
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn timers(&self) -> MutexGuard<'_, Timers> {
        self.inner.timers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The refresh failure policy: log, keep whatever is stored, carry on.
fn keep_last_good(symbol: &str, err: FetchError) -> LoadOutcome {
    tracing::warn!("Refresh of {} failed, keeping last value: {}", symbol, err);
    LoadOutcome::KeptPrevious(err)
}
