//! Translation tables for loctable
//!
//! Turns CSV text (rows = text keys, columns = languages) into a cached
//! [`Table`]:
//!
//! - **Parsing**: quote-aware parser with escaped quotes, embedded delimiters
//!   and multi-line fields
//! - **Validation**: column-count diagnostics that never block loading
//! - **Sources**: files and in-memory text, fingerprinted for change detection
//! - **Caching**: lazy re-parse only when the source changed
//!
//! # Quick Start
//!
//! ```rust
//! use loctable_table::{CsvDialect, CsvParser, MemorySource, TableCache};
//!
//! let source = MemorySource::new("strings", "key;desc;English\ngreet;;Hello\n");
//! let mut cache = TableCache::new(CsvParser::new(CsvDialect::new(';')));
//! cache.ensure_fresh(&source).unwrap();
//!
//! let table = cache.table();
//! let row = table.find_row_by_key("GREET").unwrap();
//! assert_eq!(table.cell(row, 2), Some("Hello"));
//! ```

mod cache;
mod error;
mod parser;
mod source;
mod table;
mod validator;

pub use cache::{ColumnRange, Refresh, TableCache};
pub use error::TableError;
pub use parser::{CsvDialect, CsvParser, ParseWarning, ParsedCsv, parse};
pub use source::{FileSource, MemorySource, SourceFingerprint, TableSource};
pub use table::Table;
pub use validator::{CsvValidator, ValidationFinding};

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;
