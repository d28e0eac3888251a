//! Lookup caches
//!
//! Two maps cleared together: raw cells keyed by (row, column) and
//! substituted text keyed by (row, language, argument signature). Both are
//! tagged with the language they were filled under.

use crate::placeholder::ArgumentSignature;
use std::collections::HashMap;

/// Key of a raw cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub row: usize,
    pub column: usize,
}

/// Key of a substituted text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormattedKey {
    pub row: usize,
    pub language: String,
    pub signature: ArgumentSignature,
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub cell_hits: u64,
    pub cell_misses: u64,
    pub formatted_hits: u64,
    pub formatted_misses: u64,
}

/// Cell and formatted-text caches with wholesale invalidation.
#[derive(Debug, Default)]
pub struct LookupCache {
    language: Option<String>,
    cells: HashMap<CellKey, String>,
    formatted: HashMap<FormattedKey, String>,
    stats: CacheStats,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both maps if they were filled under another language.
    ///
    /// Returns `true` when entries were dropped.
    pub fn sync_language(&mut self, language: &str) -> bool {
        if self.language.as_deref() == Some(language) {
            return false;
        }
        let had_entries = !self.is_empty();
        self.clear();
        self.language = Some(language.to_string());
        had_entries
    }

    pub fn cell(&mut self, key: CellKey) -> Option<String> {
        match self.cells.get(&key) {
            Some(value) => {
                self.stats.cell_hits += 1;
                Some(value.clone())
            }
            None => {
                self.stats.cell_misses += 1;
                None
            }
        }
    }

    pub fn insert_cell(&mut self, key: CellKey, value: String) {
        self.cells.insert(key, value);
    }

    pub fn formatted(&mut self, key: &FormattedKey) -> Option<String> {
        match self.formatted.get(key) {
            Some(value) => {
                self.stats.formatted_hits += 1;
                Some(value.clone())
            }
            None => {
                self.stats.formatted_misses += 1;
                None
            }
        }
    }

    pub fn insert_formatted(&mut self, key: FormattedKey, value: String) {
        self.formatted.insert(key, value);
    }

    /// Drop every entry; the language tag is kept.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.formatted.clear();
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn formatted_count(&self) -> usize {
        self.formatted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.formatted.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn formatted_key(row: usize, language: &str) -> FormattedKey {
        FormattedKey {
            row,
            language: language.to_string(),
            signature: ArgumentSignature::of(&args!["Ann"]),
        }
    }

    #[test]
    fn test_cell_hit_and_miss() {
        let mut cache = LookupCache::new();
        let key = CellKey { row: 1, column: 2 };

        assert_eq!(cache.cell(key), None);
        cache.insert_cell(key, "Hello".to_string());
        assert_eq!(cache.cell(key).as_deref(), Some("Hello"));

        let stats = cache.stats();
        assert_eq!((stats.cell_hits, stats.cell_misses), (1, 1));
    }

    #[test]
    fn test_language_change_clears_both_maps() {
        let mut cache = LookupCache::new();
        cache.sync_language("English");
        cache.insert_cell(CellKey { row: 1, column: 2 }, "Hello".to_string());
        cache.insert_formatted(formatted_key(1, "English"), "Hi Ann".to_string());

        assert!(!cache.sync_language("English"));
        assert_eq!(cache.cell_count(), 1);

        assert!(cache.sync_language("Chinese"));
        assert!(cache.is_empty());
        assert_eq!(cache.language(), Some("Chinese"));
    }

    #[test]
    fn test_first_sync_reports_nothing_dropped() {
        let mut cache = LookupCache::new();
        assert!(!cache.sync_language("English"));
    }

    #[test]
    fn test_formatted_entries_are_keyed_by_signature() {
        let mut cache = LookupCache::new();
        cache.insert_formatted(formatted_key(1, "English"), "Hi Ann".to_string());

        let other = FormattedKey {
            signature: ArgumentSignature::of(&args!["Bob"]),
            ..formatted_key(1, "English")
        };
        assert_eq!(cache.formatted(&other), None);
        assert_eq!(
            cache.formatted(&formatted_key(1, "English")).as_deref(),
            Some("Hi Ann")
        );
    }

    #[test]
    fn test_clear_keeps_language() {
        let mut cache = LookupCache::new();
        cache.sync_language("German");
        cache.insert_cell(CellKey { row: 0, column: 0 }, "key".to_string());
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.language(), Some("German"));
    }
}
