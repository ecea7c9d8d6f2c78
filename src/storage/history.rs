use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::history::HistoryEntry;

/// Bounded, persisted list of recent simulated completions, most recent
/// first. Read once at startup; written after every mutation.
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Missing or unreadable store degrades to an empty history.
    pub fn open(path: impl Into<PathBuf>, limit: usize) -> Self {
        let path = path.into();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            limit,
            entries,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Prepends the entry, evicts past the limit, persists.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<()> {
        self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string(&self.entries)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
