//! Bounded analysis history: the only durable state of senti.
//!
//! Entries are kept newest first and capped at [`HISTORY_LIMIT`]. The list
//! itself knows nothing about persistence; the [`store`] module provides the
//! key-value backends that the dashboard controller writes through on every
//! mutation.

pub mod store;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::sentiment::{self, Sentiment};

pub use store::{FileStore, HistoryStore, MemoryStore};

/// Maximum number of entries kept in history.
pub const HISTORY_LIMIT: usize = 50;

/// Number of input characters kept in a history entry.
pub const TEXT_PREVIEW_CHARS: usize = 100;

/// Marker appended to truncated input text.
const ELLIPSIS: &str = "...";

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One completed analysis, as stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Millisecond timestamp, strictly increasing across entries.
    pub id: i64,
    /// Input text, truncated to [`TEXT_PREVIEW_CHARS`] characters.
    pub text: String,
    /// Free-form sentiment label returned by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Comparative score returned by the API (0 when absent).
    #[serde(default)]
    pub score: f64,
    /// Local-time display timestamp.
    pub timestamp: String,
}

impl AnalysisResult {
    /// Build an entry for `input` analyzed at `now`.
    pub fn new(
        id: i64,
        input: &str,
        sentiment: Option<String>,
        score: f64,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            text: preview_text(input),
            sentiment,
            score,
            timestamp: format_timestamp(now),
        }
    }

    /// Bucketed class of this entry's label.
    pub fn class(&self) -> Sentiment {
        sentiment::classify(self.sentiment.as_deref())
    }

    /// Label for display, `"unknown"` when the API returned none.
    pub fn label(&self) -> &str {
        self.sentiment.as_deref().unwrap_or("unknown")
    }
}

/// Truncate input to the stored preview length, marking truncation.
pub fn preview_text(input: &str) -> String {
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(TEXT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    }
}

/// Format a timestamp the way the dashboard displays it: `3/14/2025, 9:05:07 PM`.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

// ---------------------------------------------------------------------------
// History list
// ---------------------------------------------------------------------------

/// Newest-first list of analysis results, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<AnalysisResult>,
}

impl History {
    /// Build a history from stored entries, dropping anything past the cap.
    pub fn from_entries(mut entries: Vec<AnalysisResult>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    /// Insert an entry at the front, evicting the oldest when full.
    pub fn push(&mut self, entry: AnalysisResult) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[AnalysisResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next entry id: the current time in milliseconds, bumped past the
    /// newest entry so ids stay strictly increasing even if the clock
    /// stalls or steps backwards.
    pub fn next_id(&self, now_ms: i64) -> i64 {
        match self.entries.first() {
            Some(newest) if newest.id >= now_ms => newest.id.saturating_add(1),
            _ => now_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
