/// Outbound sentiment-analysis API.
///
/// The dashboard talks to the endpoint through the [`SentimentApi`] trait so
/// it can be driven by a fake in tests. [`client::SentimentClient`] is the
/// real implementation: one blocking `ureq` POST per call, no retries.
pub mod client;

use crate::error::AnalysisError;

pub use client::SentimentClient;

/// Normalized reading extracted from a successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReading {
    /// Free-form label (`sentimentText`, falling back to `sentiment`).
    pub label: Option<String>,
    /// Comparative score, 0 when the API omitted it.
    pub comparative: f64,
}

/// A sentiment-analysis backend.
pub trait SentimentApi {
    /// Analyze `text` with a single request.
    ///
    /// Fails with [`AnalysisError::Config`] before any I/O when the backend
    /// has no credential.
    fn analyze(&self, text: &str) -> Result<SentimentReading, AnalysisError>;

    /// Endpoint URL, for diagnostics.
    fn endpoint(&self) -> Option<&str> {
        None
    }

    /// Whether a credential is configured.
    fn has_credential(&self) -> bool {
        true
    }
}

impl<T: SentimentApi + ?Sized> SentimentApi for Box<T> {
    fn analyze(&self, text: &str) -> Result<SentimentReading, AnalysisError> {
        (**self).analyze(text)
    }

    fn endpoint(&self) -> Option<&str> {
        (**self).endpoint()
    }

    fn has_credential(&self) -> bool {
        (**self).has_credential()
    }
}
