//! Structural checks on parsed tables.
//!
//! Findings are diagnostics only: nothing here mutates rows or stops a table
//! from being used.

use loctable_log::{info, warn};
use std::fmt;

/// Number of leading fields shown when previewing a bad row.
const PREVIEW_FIELDS: usize = 3;

/// Something odd about a parsed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFinding {
    /// No rows at all
    EmptyInput,
    /// Row 0 has no fields
    EmptyHeader,
    /// A data row has a different field count than the header
    ColumnCountMismatch {
        /// Zero-based row index
        row: usize,
        found: usize,
        expected: usize,
        /// First fields of the row, joined with `, `
        preview: String,
    },
    /// Rows consisting of a single blank field
    DegenerateRows { count: usize },
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFinding::EmptyInput => write!(f, "Empty or null parsed data"),
            ValidationFinding::EmptyHeader => write!(f, "Header row is empty"),
            ValidationFinding::ColumnCountMismatch {
                row,
                found,
                expected,
                preview,
            } => write!(
                f,
                "Row {} has {} columns, expected {}. This may cause localization issues. Row preview: {}",
                row + 1,
                found,
                expected,
                preview
            ),
            ValidationFinding::DegenerateRows { count } => write!(
                f,
                "Found {} empty rows that may indicate parsing issues",
                count
            ),
        }
    }
}

/// Column-count and shape checks.
pub struct CsvValidator;

impl CsvValidator {
    /// Inspect `rows` and log every finding as a warning.
    pub fn validate(rows: &[Vec<String>]) -> Vec<ValidationFinding> {
        let findings = Self::inspect(rows);
        for finding in &findings {
            warn!(target: "loctable::csv", "CSV validation: {}", finding);
        }
        findings
    }

    fn inspect(rows: &[Vec<String>]) -> Vec<ValidationFinding> {
        let Some(header) = rows.first() else {
            return vec![ValidationFinding::EmptyInput];
        };

        if header.is_empty() {
            return vec![ValidationFinding::EmptyHeader];
        }

        let expected = header.len();
        info!(
            target: "loctable::csv",
            "CSV structure: {} rows, {} columns in header",
            rows.len(),
            expected
        );

        let mut findings: Vec<ValidationFinding> = rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, row)| row.len() != expected)
            .map(|(i, row)| ValidationFinding::ColumnCountMismatch {
                row: i,
                found: row.len(),
                expected,
                preview: preview(row),
            })
            .collect();

        let degenerate = rows
            .iter()
            .filter(|row| row.len() == 1 && row[0].trim().is_empty())
            .count();
        if degenerate > 0 {
            findings.push(ValidationFinding::DegenerateRows { count: degenerate });
        }

        findings
    }
}

fn preview(row: &[String]) -> String {
    let mut preview = row
        .iter()
        .take(PREVIEW_FIELDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if row.len() > PREVIEW_FIELDS {
        preview.push_str("...");
    }
    preview
}
