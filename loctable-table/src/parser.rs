//! CSV Parsing
//!
//! A small RFC 4180 style parser tuned for hand-edited translation tables:
//!
//! - fields wrapped in the text qualifier may contain delimiters, line breaks
//!   and doubled qualifiers (`""` becomes `"`)
//! - `\r` is dropped everywhere, so Windows line endings parse like Unix ones
//! - a last row without a trailing line break is still emitted
//! - an unterminated quoted field closes at end of input with a warning
//!
//! The parser never returns partial data: any failure yields zero rows, and
//! callers must read an empty result as "unusable table".

use crate::{Result, TableError};
use loctable_log::{error, warn};
use std::fmt;

/// Delimiter and quote character of a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDialect {
    pub delimiter: char,
    pub qualifier: char,
}

impl CsvDialect {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            qualifier: '"',
        }
    }

    pub fn with_qualifier(mut self, qualifier: char) -> Self {
        self.qualifier = qualifier;
        self
    }

    fn check(&self) -> Result<()> {
        for (name, c) in [("delimiter", self.delimiter), ("qualifier", self.qualifier)] {
            if c == '\n' || c == '\r' {
                return Err(TableError::InvalidDialect(format!(
                    "{} cannot be a line break",
                    name
                )));
            }
        }
        if self.delimiter == self.qualifier {
            return Err(TableError::InvalidDialect(format!(
                "delimiter and qualifier are both {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self::new(';')
    }
}

/// Non-fatal problem noticed while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A quoted field was still open at end of input
    UnterminatedQuote {
        /// 1-based line where the quote was opened
        line: usize,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnterminatedQuote { line } => write!(
                f,
                "Unterminated quoted field opened on line {} runs to end of file",
                line
            ),
        }
    }
}

/// Parser output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub rows: Vec<Vec<String>>,
    pub warnings: Vec<ParseWarning>,
}

/// Quote-aware CSV parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser {
    dialect: CsvDialect,
}

impl CsvParser {
    pub fn new(dialect: CsvDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> CsvDialect {
        self.dialect
    }

    /// Parse `text`, failing safe to zero rows.
    pub fn parse(&self, text: &str) -> ParsedCsv {
        match self.try_parse(text) {
            Ok(parsed) => {
                for warning in &parsed.warnings {
                    warn!(target: "loctable::csv", "CSV parsing warning: {}", warning);
                }
                parsed
            }
            Err(e) => {
                error!(target: "loctable::csv", "CSV parsing error: {}", e);
                ParsedCsv::default()
            }
        }
    }

    /// Parse `text`, reporting why it is unusable.
    pub fn try_parse(&self, text: &str) -> Result<ParsedCsv> {
        self.dialect.check()?;

        let mut parsed = ParsedCsv::default();

        if text.is_empty() {
            return Ok(parsed);
        }

        // Keeps callers that index row 0 working on blank files.
        if text.trim().is_empty() {
            parsed.rows.push(vec![String::new()]);
            return Ok(parsed);
        }

        let CsvDialect {
            delimiter,
            qualifier,
        } = self.dialect;

        let mut field = String::new();
        let mut row: Vec<String> = Vec::new();
        let mut in_quotes = false;
        let mut line = 1;
        let mut quote_line = 0;

        let mut chars = text.chars().filter(|c| *c != '\r').peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == qualifier {
                    if chars.peek() == Some(&qualifier) {
                        field.push(qualifier);
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            } else if c == qualifier {
                in_quotes = true;
                quote_line = line;
            } else if c == delimiter {
                row.push(std::mem::take(&mut field));
            } else if c == '\n' {
                line += 1;
                row.push(std::mem::take(&mut field));
                parsed.rows.push(std::mem::take(&mut row));
            } else {
                field.push(c);
            }
        }

        if !field.is_empty() || !row.is_empty() {
            row.push(field);
        }
        if !row.is_empty() {
            parsed.rows.push(row);
        }

        if in_quotes {
            parsed
                .warnings
                .push(ParseWarning::UnterminatedQuote { line: quote_line });
        }

        Ok(parsed)
    }
}

/// Parse `text` with the default qualifier, failing safe to zero rows.
pub fn parse(text: &str, delimiter: char) -> Vec<Vec<String>> {
    CsvParser::new(CsvDialect::new(delimiter)).parse(text).rows
}
