//! Integration tests for loctable-table

use loctable_table::*;
use std::fs;
use std::time::{Duration, SystemTime};

const STRINGS: &str = "\
key;desc;English;Chinese
greet;Greeting;Hello;你好
quote;Has quotes;\"She said \"\"hi\"\"; then left\";\"她说\"\"嗨\"\"\"
multi;Two lines;\"first\nsecond\";\"第一\n第二\"
short;Missing Chinese;Only English
";

#[test]
fn test_parse_validate_and_lookup() {
    let rows = parse(STRINGS, ';');
    assert_eq!(rows.len(), 5);

    let findings = CsvValidator::validate(&rows);
    assert_eq!(findings.len(), 1);
    assert!(matches!(
        findings[0],
        ValidationFinding::ColumnCountMismatch {
            row: 4,
            found: 3,
            expected: 4,
            ..
        }
    ));

    let table = Table::new(rows);
    assert_eq!(table.cell(2, 2), Some("She said \"hi\"; then left"));
    assert_eq!(table.cell(2, 3), Some("她说\"嗨\""));
    assert_eq!(table.cell(3, 2), Some("first\nsecond"));
    assert_eq!(table.cell_or_empty(4, 3), "");
    assert_eq!(table.find_row_by_key("MULTI"), Some(3));
}

#[test]
fn test_every_cell_is_stable_across_repeated_reads() {
    let table = Table::new(parse(STRINGS, ';'));
    let first: Vec<Vec<String>> = table.rows().to_vec();

    for _ in 0..3 {
        for (r, row) in first.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                assert_eq!(table.cell(r, c), Some(value.as_str()));
            }
        }
    }
}

#[test]
fn test_file_source_change_detection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strings.csv");
    fs::write(&path, "key;desc;English\ngreet;;Hello\n").unwrap();

    let source = FileSource::new(&path);
    let mut cache = TableCache::new(CsvParser::default()).with_fixed_columns([2]);

    assert_eq!(cache.ensure_fresh(&source).unwrap(), Refresh::Reloaded);
    assert_eq!(cache.ensure_fresh(&source).unwrap(), Refresh::Unchanged);

    // Different size guarantees a new fingerprint even on coarse mtime clocks.
    fs::write(&path, "key;desc;English\ngreet;;Hello there\n").unwrap();
    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(5))
        .unwrap();

    assert_eq!(cache.ensure_fresh(&source).unwrap(), Refresh::Reloaded);
    assert_eq!(cache.table().cell(1, 2), Some("Hello there"));
    assert_eq!(cache.parse_count(), 2);
}

#[test]
fn test_missing_file_is_an_error() {
    let mut cache = TableCache::new(CsvParser::default());
    let result = cache.ensure_fresh(&FileSource::new("/no/such/strings.csv"));
    assert!(matches!(result, Err(TableError::SourceUnavailable(_))));
}
