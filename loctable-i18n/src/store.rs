//! Persisted language selection
//!
//! The selected language survives restarts as a small JSON document:
//!
//! ```json
//! {
//!   "currentSavedLanguage": "German"
//! }
//! ```

use crate::{LocalizationError, Result};
use loctable_log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// On-disk selection document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLanguage {
    #[serde(rename = "currentSavedLanguage")]
    pub current_saved_language: String,
}

/// Where the selected language is remembered between sessions.
pub trait SelectionStore: Send + Sync + fmt::Debug {
    /// The saved language tag, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Remember `language` as the current selection.
    fn save(&self, language: &str) -> Result<()>;
}

/// JSON file store; parent directories are created on first save.
#[derive(Debug, Clone)]
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionStore for FileSelectionStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let saved: SavedLanguage = serde_json::from_str(&content).map_err(|e| {
            LocalizationError::Store(format!("{}: {}", self.path.display(), e))
        })?;

        let language = saved.current_saved_language.trim();
        Ok((!language.is_empty()).then(|| language.to_string()))
    }

    fn save(&self, language: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&SavedLanguage {
            current_saved_language: language.to_string(),
        })?;
        fs::write(&self.path, json)?;

        debug!(
            target: "loctable::store",
            "Saved language '{}' to {}",
            language,
            self.path.display()
        );
        Ok(())
    }
}

/// Process-local store, handy for tests and hosts with their own settings.
#[derive(Debug, Default)]
pub struct MemorySelectionStore {
    saved: RwLock<Option<String>>,
    writes: AtomicUsize,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `language` already saved.
    pub fn with_saved(language: impl Into<String>) -> Self {
        Self {
            saved: RwLock::new(Some(language.into())),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn saved(&self) -> Option<String> {
        self.saved.read().clone()
    }

    /// Number of `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl SelectionStore for MemorySelectionStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.saved())
    }

    fn save(&self, language: &str) -> Result<()> {
        *self.saved.write() = Some(language.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LocalizationFolder").join("language_global.json");
        let store = FileSelectionStore::new(&path);

        assert_eq!(store.load().unwrap(), None);
        store.save("German").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("German"));
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("language_global.json");
        FileSelectionStore::new(&path).save("Polish").unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["currentSavedLanguage"], "Polish");
    }

    #[test]
    fn test_blank_saved_language_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("language_global.json");
        fs::write(&path, r#"{ "currentSavedLanguage": "  " }"#).unwrap();

        assert_eq!(FileSelectionStore::new(&path).load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("language_global.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileSelectionStore::new(&path).load(),
            Err(LocalizationError::Store(_))
        ));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemorySelectionStore::with_saved("French");
        assert_eq!(store.load().unwrap().as_deref(), Some("French"));

        store.save("Italian").unwrap();
        assert_eq!(store.saved().as_deref(), Some("Italian"));
        assert_eq!(store.write_count(), 1);
    }
}
