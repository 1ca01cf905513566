//! Per-symbol quote store shared between the driver and renderers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::quote::QuoteResult;

/// The latest accepted result for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredQuote {
    /// Sequence number of the request that produced this result.
    pub seq: u64,
    pub result: QuoteResult,
    pub updated_at: DateTime<Utc>,
}

/// Issued by [`QuoteStore::begin`] before a fetch starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub symbol: String,
    pub seq: u64,
}

/// What happened to a result handed to [`QuoteStore::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// A result from a later request is already stored.
    Stale,
    /// The store was closed at shutdown.
    Closed,
}

/// Thread-safe `symbol -> StoredQuote` map with whole-entry replacement.
///
/// Writes are sequence-guarded: every fetch takes a ticket up front, and a
/// result is only stored if its ticket is newer than the stored entry's. A
/// slow early request that resolves after a fast later one is discarded.
pub struct QuoteStore {
    entries: DashMap<String, StoredQuote>,
    next_seq: AtomicU64,
    closed: AtomicBool,
}

impl Default for QuoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_seq: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Allocates the sequence number for a fetch that is about to start.
    pub fn begin(&self, symbol: &str) -> FetchTicket {
        FetchTicket {
            symbol: symbol.to_string(),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn commit(&self, ticket: FetchTicket, result: QuoteResult) -> CommitOutcome {
        if self.is_closed() {
            tracing::debug!("Dropping {} #{}: store closed", ticket.symbol, ticket.seq);
            return CommitOutcome::Closed;
        }

        let stored = StoredQuote {
            seq: ticket.seq,
            result,
            updated_at: Utc::now(),
        };

        // The entry guard keeps check-and-replace atomic per symbol.
        let outcome = match self.entries.entry(ticket.symbol.clone()) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                if entry.get().seq > ticket.seq {
                    CommitOutcome::Stale
                } else {
                    entry.insert(stored);
                    CommitOutcome::Applied
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(stored);
                CommitOutcome::Applied
            }
        };

        match outcome {
            CommitOutcome::Applied => {
                tracing::debug!("Stored {} #{}", ticket.symbol, ticket.seq)
            }
            _ => tracing::debug!(
                "Discarding out-of-order result for {} #{}",
                ticket.symbol,
                ticket.seq
            ),
        }
        outcome
    }

    pub fn get(&self, symbol: &str) -> Option<StoredQuote> {
        self.entries.get(symbol).map(|e| e.value().clone())
    }

    /// Copy of every entry, sorted by symbol.
    pub fn snapshot(&self) -> Vec<(String, StoredQuote)> {
        let mut all: Vec<(String, StoredQuote)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stops accepting writes. Reads keep working.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::SeriesPoint;

    fn result(last: f64) -> QuoteResult {
        QuoteResult {
            points: vec![SeriesPoint { x: 1000, y: last }],
            last: Some(last),
            change_pct: 0.0,
            previous_close: None,
        }
    }

    #[test]
    fn commit_and_get() {
        let store = QuoteStore::new();
        let ticket = store.begin("NVDA");
        assert_eq!(store.commit(ticket, result(1.0)), CommitOutcome::Applied);
        assert_eq!(store.get("NVDA").unwrap().result.last, Some(1.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn miss_returns_none() {
        let store = QuoteStore::new();
        assert!(store.get("NVDA").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn sequence_numbers_increase() {
        let store = QuoteStore::new();
        let a = store.begin("NVDA");
        let b = store.begin("SOFI");
        let c = store.begin("NVDA");
        assert!(a.seq < b.seq && b.seq < c.seq);
    }

    #[test]
    fn older_result_arriving_late_is_discarded() {
        let store = QuoteStore::new();
        let older = store.begin("NVDA");
        let newer = store.begin("NVDA");

        assert_eq!(store.commit(newer, result(2.0)), CommitOutcome::Applied);
        assert_eq!(store.commit(older, result(1.0)), CommitOutcome::Stale);

        let stored = store.get("NVDA").unwrap();
        assert_eq!(stored.result.last, Some(2.0));
    }

    #[test]
    fn in_order_results_overwrite() {
        let store = QuoteStore::new();
        let first = store.begin("NVDA");
        let second = store.begin("NVDA");

        assert_eq!(store.commit(first, result(1.0)), CommitOutcome::Applied);
        assert_eq!(store.commit(second, result(2.0)), CommitOutcome::Applied);
        assert_eq!(store.get("NVDA").unwrap().result.last, Some(2.0));
    }

    #[test]
    fn guard_is_per_symbol() {
        let store = QuoteStore::new();
        let nvda = store.begin("NVDA");
        let sofi = store.begin("SOFI");

        assert_eq!(store.commit(sofi, result(9.0)), CommitOutcome::Applied);
        assert_eq!(store.commit(nvda, result(1.0)), CommitOutcome::Applied);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn closed_store_rejects_writes() {
        let store = QuoteStore::new();
        let before = store.begin("NVDA");
        store.commit(before, result(1.0));

        let late = store.begin("NVDA");
        store.close();
        assert!(store.is_closed());
        assert_eq!(store.commit(late, result(5.0)), CommitOutcome::Closed);
        assert_eq!(store.get("NVDA").unwrap().result.last, Some(1.0));
    }

    #[test]
    fn snapshot_sorted_by_symbol() {
        let store = QuoteStore::new();
        for sym in ["SOFI", "BTC-USD", "NVDA"] {
            let t = store.begin(sym);
            store.commit(t, result(1.0));
        }
        let keys: Vec<String> = store.snapshot().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["BTC-USD", "NVDA", "SOFI"]);
    }
}
