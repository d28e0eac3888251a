//! Table Sources
//!
//! Where the CSV text comes from, and how to tell that it changed.

use crate::{Result, TableError};
use loctable_log::warn;
use parking_lot::RwLock;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Modification stamp and byte size of a source.
///
/// For files the stamp is the modification time in nanoseconds since the Unix
/// epoch; in-memory sources use a revision counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    pub modified: u128,
    pub size: u64,
}

/// Backing resource of a translation table.
pub trait TableSource: Send + Sync + fmt::Debug {
    /// Human readable name used in log messages.
    fn name(&self) -> String;

    /// Current fingerprint, checked before every potential re-parse.
    fn fingerprint(&self) -> Result<SourceFingerprint>;

    /// Full UTF-8 text of the table.
    fn read_text(&self) -> Result<String>;
}

/// A CSV file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fingerprint(&self) -> Result<SourceFingerprint> {
        let metadata = fs::metadata(&self.path).map_err(|e| {
            TableError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        Ok(SourceFingerprint {
            modified,
            size: metadata.len(),
        })
    }

    fn read_text(&self) -> Result<String> {
        let bytes = fs::read(&self.path)?;
        let mut text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    target: "loctable::table",
                    "{} is not valid UTF-8, invalid bytes replaced with U+FFFD",
                    self.name()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        // Spreadsheet exports often start with a byte order mark.
        if text.starts_with('\u{feff}') {
            text.drain(..'\u{feff}'.len_utf8());
        }
        Ok(text)
    }
}

/// Table text held in memory, e.g. embedded in the binary or fetched remotely.
#[derive(Debug, Default)]
pub struct MemorySource {
    name: String,
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    text: String,
    revision: u128,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(MemoryState {
                text: text.into(),
                revision: 1,
            }),
        }
    }

    /// Swap in new text; the next freshness check sees a new fingerprint.
    pub fn replace(&self, text: impl Into<String>) {
        let mut state = self.state.write();
        state.text = text.into();
        state.revision += 1;
    }
}

impl TableSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fingerprint(&self) -> Result<SourceFingerprint> {
        let state = self.state.read();
        Ok(SourceFingerprint {
            modified: state.revision,
            size: state.text.len() as u64,
        })
    }

    fn read_text(&self) -> Result<String> {
        Ok(self.state.read().text.clone())
    }
}
