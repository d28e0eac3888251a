//! Parsed translation table.

use loctable_log::warn;

/// Rows of string fields; row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Split on line breaks, then on `delimiter`, ignoring quotes.
    ///
    /// Used when the quote-aware parser produced nothing usable. Empty lines
    /// become rows without fields.
    pub fn naive_split(text: &str, delimiter: char) -> Self {
        let rows = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .map(|line| {
                if line.is_empty() {
                    Vec::new()
                } else {
                    line.split(delimiter).map(str::to_string).collect()
                }
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Row 0, or an empty slice for an empty table.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Bounds-checked cell access; out-of-range positions log a warning and
    /// read as the empty string.
    pub fn cell_or_empty(&self, row: usize, column: usize) -> &str {
        match self.rows.get(row) {
            Some(fields) => match fields.get(column) {
                Some(value) => value,
                None => {
                    warn!(
                        target: "loctable::table",
                        "Row {} does not contain an element at column {}. Columns available: {}",
                        row,
                        column,
                        fields.len()
                    );
                    ""
                }
            },
            None => {
                warn!(
                    target: "loctable::table",
                    "Not enough rows in the CSV file. Requested row: {}, Total rows: {}",
                    row,
                    self.rows.len()
                );
                ""
            }
        }
    }

    /// First row whose column 0 equals `key`, trimmed and case-insensitive.
    pub fn find_row_by_key(&self, key: &str) -> Option<usize> {
        let needle = key.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.rows.iter().position(|row| {
            row.first()
                .is_some_and(|first| first.trim().to_lowercase() == needle)
        })
    }

    /// Index of the right-most header cell that is not blank.
    pub fn last_filled_header_column(&self) -> Option<usize> {
        self.header().iter().rposition(|h| !h.trim().is_empty())
    }
}
