//! Fuzz target for CSV parsing.
//!
//! Feeds arbitrary text and dialects through the parser, validator and
//! table model without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use loctable_table::{CsvDialect, CsvParser, CsvValidator, Table};

/// Arbitrary parsing scenario for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzCsv {
    text: String,
    delimiter: char,
    qualifier: char,
    /// Lookups to try against the parsed table
    cells: Vec<(u8, u8)>,
    key: String,
}

fuzz_target!(|data: FuzzCsv| {
    let dialect = CsvDialect::new(data.delimiter).with_qualifier(data.qualifier);
    let parser = CsvParser::new(dialect);

    // Invalid dialects must be rejected, never panic
    let Ok(parsed) = parser.try_parse(&data.text) else {
        return;
    };

    let _ = CsvValidator::validate(&parsed.rows);

    let table = Table::new(parsed.rows);
    for (row, column) in &data.cells {
        let _ = table.cell(*row as usize, *column as usize);
    }
    let _ = table.find_row_by_key(&data.key);
    let _ = table.last_filled_header_column();

    // The fallback splitter must cope with anything
    let _ = Table::naive_split(&data.text, data.delimiter);
});
