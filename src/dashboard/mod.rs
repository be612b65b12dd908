//! Dashboard controller: the single stateful component of senti.
//!
//! Owns the in-memory history, a [`SentimentApi`] backend, and a
//! [`HistoryStore`]. The store is read once on construction and rewritten on
//! every history mutation. Both front ends (CLI and web dashboard) go through
//! this type.
//!
//! Analyses are single-flight: while one call is waiting on the network, a
//! concurrent call returns [`AnalysisError::Busy`] without sending a request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use chrono::Local;

use crate::analytics::{self, SentimentCounts, Summary};
use crate::api::SentimentApi;
use crate::error::AnalysisError;
use crate::history::{AnalysisResult, History, HistoryStore};

pub struct Dashboard<A, S> {
    api: A,
    store: S,
    history: Mutex<History>,
    in_flight: AtomicBool,
}

impl<A: SentimentApi, S: HistoryStore> Dashboard<A, S> {
    /// Build a controller, loading any previously stored history.
    ///
    /// An unreadable or malformed stored history is logged and replaced by
    /// an empty one on the next write.
    pub fn new(api: A, store: S) -> Self {
        let entries = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable history");
            Vec::new()
        });
        tracing::debug!(entries = entries.len(), "history loaded");

        Self {
            api,
            store,
            history: Mutex::new(History::from_entries(entries)),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Analyze `text` and record the result.
    ///
    /// Returns `Ok(None)` without touching the network or history when the
    /// input is empty or whitespace-only.
    pub fn analyze(&self, text: &str) -> Result<Option<AnalysisResult>, AnalysisError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let _guard = FlightGuard::acquire(&self.in_flight).ok_or(AnalysisError::Busy)?;

        let reading = self.api.analyze(text)?;

        let now = Local::now();
        let mut history = self.lock();
        let id = history.next_id(now.timestamp_millis());
        let entry = AnalysisResult::new(id, text, reading.label, reading.comparative, now);

        history.push(entry.clone());
        self.persist(&history);

        tracing::info!(id = entry.id, sentiment = entry.label(), "analysis recorded");
        Ok(Some(entry))
    }

    /// Remove the persisted entry, then empty the history.
    ///
    /// When removal fails the in-memory history is left as it was.
    pub fn clear(&self) -> Result<()> {
        let mut history = self.lock();
        self.store.remove()?;
        history.clear();
        tracing::info!("history cleared");
        Ok(())
    }

    /// Snapshot of the history, newest first.
    pub fn entries(&self) -> Vec<AnalysisResult> {
        self.lock().entries().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Counts per class, derived from the current history.
    pub fn counts(&self) -> SentimentCounts {
        analytics::aggregate(self.lock().entries())
    }

    /// Full stats view, derived from the current history.
    pub fn summary(&self) -> Summary {
        analytics::summarize(self.lock().entries())
    }

    /// Whether an analysis is currently waiting on the network.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self, history: &History) {
        if let Err(e) = self.store.save(history.entries()) {
            tracing::warn!(error = %format!("{e:#}"), "failed to persist history");
        }
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds the in-flight flag for the duration of one analysis.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
