//! Presentation data derived from history.
//!
//! Everything here is a pure function of the current history slice and is
//! recomputed on every render; nothing is cached.

use serde::Serialize;

use crate::history::AnalysisResult;
use crate::sentiment::Sentiment;

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Number of history entries per sentiment class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    pub fn get(&self, class: Sentiment) -> usize {
        match class {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    /// Percentage for a class, returns 0.0 if total is zero.
    pub fn pct(&self, class: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.get(class) as f64 / total as f64) * 100.0
        }
    }
}

/// Count entries per sentiment class.
pub fn aggregate(entries: &[AnalysisResult]) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for entry in entries {
        match entry.class() {
            Sentiment::Positive => counts.positive += 1,
            Sentiment::Negative => counts.negative += 1,
            Sentiment::Neutral => counts.neutral += 1,
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// Doughnut chart series: one slice per class, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<&'static str>,
    pub data: Vec<usize>,
    pub colors: Vec<&'static str>,
}

pub fn chart_data(counts: &SentimentCounts) -> ChartData {
    ChartData {
        labels: Sentiment::ALL.iter().map(|c| c.label()).collect(),
        data: Sentiment::ALL.iter().map(|&c| counts.get(c)).collect(),
        colors: Sentiment::ALL.iter().map(|c| c.color()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Everything the stats views render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub counts: SentimentCounts,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
    /// Mean comparative score, 0.0 for an empty history.
    pub average_score: f64,
    pub chart: ChartData,
}

pub fn summarize(entries: &[AnalysisResult]) -> Summary {
    let counts = aggregate(entries);
    let average_score = if entries.is_empty() {
        0.0
    } else {
        entries.iter().map(|e| e.score).sum::<f64>() / entries.len() as f64
    };

    Summary {
        total: entries.len(),
        counts,
        positive_pct: counts.pct(Sentiment::Positive),
        negative_pct: counts.pct(Sentiment::Negative),
        neutral_pct: counts.pct(Sentiment::Neutral),
        average_score,
        chart: chart_data(&counts),
    }
}

/// Entries of a single class, preserving order.
pub fn filter_by_class(entries: &[AnalysisResult], class: Sentiment) -> Vec<&AnalysisResult> {
    entries.iter().filter(|e| e.class() == class).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
