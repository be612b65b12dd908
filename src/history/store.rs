/// Key-value persistence for the analysis history.
///
/// History is stored as one serialized JSON array under a single key. The
/// file backend keeps it at `~/.senti/history.json` (overridable through
/// `[history] file` or `SENTI_HISTORY_FILE`); the memory backend keeps it in
/// a string slot and is used by tests and embedders that want no disk I/O.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};

use super::AnalysisResult;

/// Read/write interface for the persisted history entry.
pub trait HistoryStore {
    /// Read the stored history. A missing entry yields an empty list.
    fn load(&self) -> Result<Vec<AnalysisResult>>;

    /// Replace the stored entry with the full serialized history.
    fn save(&self, entries: &[AnalysisResult]) -> Result<()>;

    /// Remove the stored entry. Removing a missing entry is not an error.
    fn remove(&self) -> Result<()>;

    /// Human-readable location of the stored entry, if it has one.
    fn location(&self) -> Option<String> {
        None
    }
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// History stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the history file currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl HistoryStore for FileStore {
    fn load(&self) -> Result<Vec<AnalysisResult>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("malformed history file {}", self.path.display()))
    }

    fn save(&self, entries: &[AnalysisResult]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create history directory")?;
        }

        let json = serde_json::to_string(entries).context("failed to serialize history")?;

        // Write-then-rename: readers see the old or the new history, never a partial one.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to remove {}", self.path.display()))
            }
        }
    }

    fn location(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

/// Default history location: `~/.senti/history.json`.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".senti").join("history.json"))
}

// ---------------------------------------------------------------------------
// Memory backend
// ---------------------------------------------------------------------------

/// History stored in memory as the same serialized JSON the file holds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing serialized history.
    pub fn with_entries(entries: &[AnalysisResult]) -> Result<Self> {
        let store = Self::new();
        *store.lock() = Some(serde_json::to_string(entries)?);
        Ok(store)
    }

    /// Raw stored value, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<AnalysisResult>> {
        match self.lock().as_deref() {
            Some(raw) => serde_json::from_str(raw).context("malformed stored history"),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[AnalysisResult]) -> Result<()> {
        let json = serde_json::to_string(entries).context("failed to serialize history")?;
        *self.lock() = Some(json);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
