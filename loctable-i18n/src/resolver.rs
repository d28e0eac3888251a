//! Language Resolution
//!
//! Maps a language identifier to a table column:
//!
//! 1. exact (case-insensitive) match on a fixed language name
//! 2. exact (case-insensitive) match on a header cell
//! 3. substring match on a header cell, in either direction
//!
//! A header match that lands on a fixed language's column resolves to that
//! fixed language, so a fixed name always wins over free text.

use crate::language::{ActiveLanguage, LanguageMap, eq_ignore_case};
use loctable_log::trace;
use loctable_table::Table;

/// How a header cell matched an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    Exact(usize),
    Partial(usize),
}

impl HeaderMatch {
    pub fn column(self) -> usize {
        match self {
            HeaderMatch::Exact(column) | HeaderMatch::Partial(column) => column,
        }
    }
}

/// Language identifier to column resolution.
pub struct LanguageResolver;

impl LanguageResolver {
    /// Resolve `identifier` against the fixed languages, then `header`.
    pub fn resolve(
        identifier: &str,
        languages: &LanguageMap,
        header: &[String],
    ) -> Option<ActiveLanguage> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        if let Some(fixed) = languages.get(identifier) {
            return Some(ActiveLanguage::fixed(fixed));
        }

        let found = Self::match_header(identifier, header)?;
        trace!(
            target: "loctable::i18n",
            "Language '{}' matched header {:?}",
            identifier,
            found
        );

        let column = found.column();
        Some(match languages.by_column(column) {
            Some(fixed) => ActiveLanguage::fixed(fixed),
            None => ActiveLanguage::custom(identifier, column),
        })
    }

    /// Find `identifier` in the header row: exact matches first, then the
    /// first cell that contains it or is contained by it.
    ///
    /// Blank header cells never match.
    pub fn match_header(identifier: &str, header: &[String]) -> Option<HeaderMatch> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        let cells = || {
            header
                .iter()
                .map(|cell| cell.trim())
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
        };

        if let Some((column, _)) = cells().find(|(_, cell)| eq_ignore_case(cell, identifier)) {
            return Some(HeaderMatch::Exact(column));
        }

        // Case-insensitive like the exact pass, so "brazil" finds
        // "Portuguese (Brazil)". Short fragments such as "port" match too.
        let needle = identifier.to_lowercase();
        cells()
            .find(|(_, cell)| {
                let cell = cell.to_lowercase();
                cell.contains(&needle) || needle.contains(&cell)
            })
            .map(|(column, _)| HeaderMatch::Partial(column))
    }

    /// First row whose column 0 equals `key`, trimmed and case-insensitive.
    pub fn find_row_by_key(table: &Table, key: &str) -> Option<usize> {
        table.find_row_by_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{FixedLanguage, LanguageKind};

    fn header() -> Vec<String> {
        ["key", "desc", "English", "Chinese", "", "Portuguese (Brazil)"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn languages() -> LanguageMap {
        LanguageMap::new([FixedLanguage::new("English", 2)])
    }

    #[test]
    fn test_header_match_any_case() {
        let header = header();
        for name in ["chinese", "CHINESE", "Chinese", "  chInese "] {
            assert_eq!(
                LanguageResolver::match_header(name, &header),
                Some(HeaderMatch::Exact(3))
            );
        }
    }

    #[test]
    fn test_unknown_language_is_not_found() {
        assert_eq!(LanguageResolver::match_header("Klingon", &header()), None);
        assert_eq!(LanguageResolver::resolve("Klingon", &languages(), &header()), None);
    }

    #[test]
    fn test_substring_match_in_both_directions() {
        let header = header();
        assert_eq!(
            LanguageResolver::match_header("Portuguese", &header),
            Some(HeaderMatch::Partial(5))
        );
        assert_eq!(
            LanguageResolver::match_header("Simplified Chinese", &header),
            Some(HeaderMatch::Partial(3))
        );
    }

    #[test]
    fn test_partial_match_ignores_case() {
        let header = header();
        for name in ["port", "BRAZIL", "portuguese (brazil) dialect"] {
            assert_eq!(
                LanguageResolver::match_header(name, &header),
                Some(HeaderMatch::Partial(5))
            );
        }

        let resolved = LanguageResolver::resolve("port", &languages(), &header).unwrap();
        assert_eq!(resolved.column, 5);
        assert_eq!(resolved.tag, "port");
        assert_eq!(resolved.kind, LanguageKind::Custom);
    }

    #[test]
    fn test_exact_match_beats_earlier_partial_match() {
        let header: Vec<String> = ["key", "Chinese (Traditional)", "Chinese"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            LanguageResolver::match_header("chinese", &header),
            Some(HeaderMatch::Exact(2))
        );
    }

    #[test]
    fn test_blank_header_cells_never_match() {
        let header: Vec<String> = vec!["".into(), "  ".into(), "German".into()];
        assert_eq!(
            LanguageResolver::match_header("Ger", &header),
            Some(HeaderMatch::Partial(2))
        );
        assert_eq!(LanguageResolver::match_header("", &header), None);
    }

    #[test]
    fn test_fixed_name_needs_no_header() {
        let resolved = LanguageResolver::resolve("english", &languages(), &[]).unwrap();
        assert_eq!(resolved.tag, "English");
        assert_eq!(resolved.column, 2);
        assert_eq!(resolved.kind, LanguageKind::Fixed);
    }

    #[test]
    fn test_header_match_on_fixed_column_becomes_fixed() {
        let resolved = LanguageResolver::resolve("Engl", &languages(), &header()).unwrap();
        assert_eq!(resolved, ActiveLanguage::fixed(&FixedLanguage::new("English", 2)));
    }

    #[test]
    fn test_header_only_language_is_custom() {
        let resolved = LanguageResolver::resolve(" Chinese ", &languages(), &header()).unwrap();
        assert_eq!(resolved, ActiveLanguage::custom("Chinese", 3));
    }

    #[test]
    fn test_find_row_by_key() {
        let table = Table::new(vec![vec!["greet".into()], vec!["farewell".into()]]);
        assert_eq!(LanguageResolver::find_row_by_key(&table, "GREET"), Some(0));
        assert_eq!(LanguageResolver::find_row_by_key(&table, "nope"), None);
    }
}
