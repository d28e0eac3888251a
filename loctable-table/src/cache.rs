//! Table Cache
//!
//! Holds the parsed table and re-parses only when the source fingerprint
//! moves.

use crate::parser::CsvParser;
use crate::source::{SourceFingerprint, TableSource};
use crate::table::Table;
use crate::validator::{CsvValidator, ValidationFinding};
use crate::Result;
use loctable_log::{debug, error, info, warn};

/// Outcome of a freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The cached table is still current
    Unchanged,
    /// The table was (re)built from the source
    Reloaded,
}

/// Span of columns that can hold translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnRange {
    /// Lowest fixed-language column, or 0 without fixed languages
    pub min: usize,
    /// Right-most non-blank header column
    pub max: usize,
}

impl ColumnRange {
    fn compute(fixed_columns: &[usize], table: &Table) -> Self {
        Self {
            min: fixed_columns.iter().copied().min().unwrap_or(0),
            max: table.last_filled_header_column().unwrap_or(0),
        }
    }

    pub fn contains(&self, column: usize) -> bool {
        (self.min..=self.max).contains(&column)
    }
}

/// Lazily (re)built translation table.
#[derive(Debug, Default)]
pub struct TableCache {
    parser: CsvParser,
    fixed_columns: Vec<usize>,
    table: Table,
    loaded: bool,
    fingerprint: Option<SourceFingerprint>,
    column_range: ColumnRange,
    findings: Vec<ValidationFinding>,
    parse_count: u64,
}

impl TableCache {
    pub fn new(parser: CsvParser) -> Self {
        Self {
            parser,
            ..Self::default()
        }
    }

    /// Columns owned by fixed languages; they anchor the column range.
    pub fn with_fixed_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.fixed_columns = columns.into_iter().collect();
        self
    }

    /// Re-parse `source` if nothing is cached or its fingerprint changed.
    ///
    /// When the source cannot be inspected an already cached table is kept.
    pub fn ensure_fresh(&mut self, source: &dyn TableSource) -> Result<Refresh> {
        let fingerprint = match source.fingerprint() {
            Ok(fingerprint) => fingerprint,
            Err(e) if self.loaded => {
                warn!(
                    target: "loctable::table",
                    "Cannot check {} for changes, keeping cached table: {}",
                    source.name(),
                    e
                );
                return Ok(Refresh::Unchanged);
            }
            Err(e) => {
                error!(target: "loctable::table", "Failed to load CSV file: {}", e);
                return Err(e);
            }
        };

        if self.loaded && self.fingerprint == Some(fingerprint) {
            return Ok(Refresh::Unchanged);
        }

        self.rebuild(source, fingerprint)
    }

    /// Re-parse `source` unconditionally.
    pub fn reload(&mut self, source: &dyn TableSource) -> Result<Refresh> {
        let fingerprint = source.fingerprint()?;
        self.rebuild(source, fingerprint)
    }

    fn rebuild(
        &mut self,
        source: &dyn TableSource,
        fingerprint: SourceFingerprint,
    ) -> Result<Refresh> {
        let text = match source.read_text() {
            Ok(text) => text,
            Err(e) => {
                error!(
                    target: "loctable::table",
                    "Failed to read {}: {}",
                    source.name(),
                    e
                );
                return if self.loaded {
                    Ok(Refresh::Unchanged)
                } else {
                    Err(e)
                };
            }
        };

        let parsed = self.parser.parse(&text);
        self.parse_count += 1;
        self.findings = CsvValidator::validate(&parsed.rows);

        self.table = if parsed.rows.is_empty() {
            warn!(
                target: "loctable::table",
                "Parsed CSV data from {} is empty, using fallback parsing",
                source.name()
            );
            Table::naive_split(&text, self.parser.dialect().delimiter)
        } else {
            info!(
                target: "loctable::table",
                "CSV file successfully parsed: {} rows, {} columns",
                parsed.rows.len(),
                parsed.rows[0].len()
            );
            Table::new(parsed.rows)
        };

        self.loaded = true;
        self.fingerprint = Some(fingerprint);
        self.column_range = ColumnRange::compute(&self.fixed_columns, &self.table);
        debug!(
            target: "loctable::table",
            "Column range for {}: {}..={}",
            source.name(),
            self.column_range.min,
            self.column_range.max
        );

        Ok(Refresh::Reloaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn column_range(&self) -> ColumnRange {
        self.column_range
    }

    /// Validator findings of the most recent parse.
    pub fn findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    /// How many times the source has been parsed.
    pub fn parse_count(&self) -> u64 {
        self.parse_count
    }

    pub fn fingerprint(&self) -> Option<SourceFingerprint> {
        self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CsvDialect;
    use crate::source::MemorySource;
    use crate::TableError;

    const CSV: &str = "key;desc;English;Chinese\ngreet;;Hello;你好\n";

    fn cache() -> TableCache {
        TableCache::new(CsvParser::new(CsvDialect::new(';'))).with_fixed_columns([2, 3])
    }

    #[test]
    fn test_first_check_parses() {
        let source = MemorySource::new("inline", CSV);
        let mut cache = cache();

        assert!(!cache.is_loaded());
        assert_eq!(cache.ensure_fresh(&source).unwrap(), Refresh::Reloaded);
        assert_eq!(cache.table().cell(1, 2), Some("Hello"));
        assert_eq!(cache.column_range(), ColumnRange { min: 2, max: 3 });
    }

    #[test]
    fn test_unchanged_source_is_not_reparsed() {
        let source = MemorySource::new("inline", CSV);
        let mut cache = cache();

        cache.ensure_fresh(&source).unwrap();
        assert_eq!(cache.ensure_fresh(&source).unwrap(), Refresh::Unchanged);
        assert_eq!(cache.ensure_fresh(&source).unwrap(), Refresh::Unchanged);
        assert_eq!(cache.parse_count(), 1);
    }

    #[test]
    fn test_changed_source_is_reparsed() {
        let source = MemorySource::new("inline", CSV);
        let mut cache = cache();
        cache.ensure_fresh(&source).unwrap();

        source.replace("key;desc;English\ngreet;;Hi\n");
        assert_eq!(cache.ensure_fresh(&source).unwrap(), Refresh::Reloaded);
        assert_eq!(cache.table().cell(1, 2), Some("Hi"));
        assert_eq!(cache.column_range().max, 2);
        assert_eq!(cache.parse_count(), 2);
    }

    #[test]
    fn test_forced_reload() {
        let source = MemorySource::new("inline", CSV);
        let mut cache = cache();
        cache.ensure_fresh(&source).unwrap();

        assert_eq!(cache.reload(&source).unwrap(), Refresh::Reloaded);
        assert_eq!(cache.parse_count(), 2);
    }

    #[test]
    fn test_empty_source_falls_back_to_naive_split() {
        let source = MemorySource::new("inline", "");
        let mut cache = cache();

        let (refresh, records) = loctable_log::capture(|| cache.ensure_fresh(&source).unwrap());
        assert_eq!(refresh, Refresh::Reloaded);
        assert_eq!(cache.table().row_count(), 1);
        assert_eq!(cache.findings(), &[ValidationFinding::EmptyInput]);
        assert!(records.iter().any(|r| r.message.contains("fallback")));
    }

    #[test]
    fn test_broken_dialect_falls_back_to_naive_split() {
        let source = MemorySource::new("inline", "key|English\ngreet|Hello\n");
        let mut cache = TableCache::new(CsvParser::new(CsvDialect::new('|').with_qualifier('|')));

        cache.ensure_fresh(&source).unwrap();
        assert_eq!(cache.table().cell(1, 1), Some("Hello"));
    }

    #[test]
    fn test_range_without_fixed_languages_starts_at_zero() {
        let source = MemorySource::new("inline", CSV);
        let mut cache = TableCache::new(CsvParser::default());
        cache.ensure_fresh(&source).unwrap();
        assert_eq!(cache.column_range(), ColumnRange { min: 0, max: 3 });
        assert!(cache.column_range().contains(3));
        assert!(!cache.column_range().contains(4));
    }

    #[derive(Debug)]
    struct Unreachable;

    impl TableSource for Unreachable {
        fn name(&self) -> String {
            "unreachable".to_string()
        }

        fn fingerprint(&self) -> Result<SourceFingerprint> {
            Err(TableError::SourceUnavailable("offline".to_string()))
        }

        fn read_text(&self) -> Result<String> {
            Err(TableError::SourceUnavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_unavailable_source_without_cache_is_an_error() {
        let mut cache = cache();
        assert!(cache.ensure_fresh(&Unreachable).is_err());
        assert!(!cache.is_loaded());
    }

    #[test]
    fn test_unavailable_source_keeps_cached_table() {
        let mut cache = cache();
        cache.ensure_fresh(&MemorySource::new("inline", CSV)).unwrap();

        assert_eq!(cache.ensure_fresh(&Unreachable).unwrap(), Refresh::Unchanged);
        assert_eq!(cache.table().cell(1, 3), Some("你好"));
    }
}
