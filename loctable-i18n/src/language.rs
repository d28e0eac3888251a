//! Languages
//!
//! Fixed languages live at agreed columns; anything else found by header
//! text is a custom language.

use loctable_config::LanguageColumn;
use std::fmt;

/// Unicode-aware case-insensitive comparison.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// A named language with an agreed column index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLanguage {
    pub name: String,
    pub column: usize,
}

impl FixedLanguage {
    pub fn new(name: impl Into<String>, column: usize) -> Self {
        Self {
            name: name.into(),
            column,
        }
    }
}

impl From<&LanguageColumn> for FixedLanguage {
    fn from(language: &LanguageColumn) -> Self {
        Self::new(language.name.trim(), language.column)
    }
}

/// The closed set of fixed languages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageMap {
    languages: Vec<FixedLanguage>,
}

impl LanguageMap {
    pub fn new(languages: impl IntoIterator<Item = FixedLanguage>) -> Self {
        Self {
            languages: languages.into_iter().collect(),
        }
    }

    pub fn from_columns(columns: &[LanguageColumn]) -> Self {
        Self::new(columns.iter().map(FixedLanguage::from))
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&FixedLanguage> {
        let name = name.trim();
        self.languages
            .iter()
            .find(|l| eq_ignore_case(&l.name, name))
    }

    /// The fixed language that owns `column`, if any.
    pub fn by_column(&self, column: usize) -> Option<&FixedLanguage> {
        self.languages.iter().find(|l| l.column == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.languages.iter().map(|l| l.column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FixedLanguage> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// How the active language was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageKind {
    /// One of the configured fixed languages
    Fixed,
    /// Resolved from header text only
    Custom,
}

/// The language lookups currently read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLanguage {
    /// Name shown to users and persisted between sessions
    pub tag: String,
    pub column: usize,
    pub kind: LanguageKind,
}

impl ActiveLanguage {
    pub fn fixed(language: &FixedLanguage) -> Self {
        Self {
            tag: language.name.clone(),
            column: language.column,
            kind: LanguageKind::Fixed,
        }
    }

    pub fn custom(tag: impl Into<String>, column: usize) -> Self {
        Self {
            tag: tag.into(),
            column,
            kind: LanguageKind::Custom,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.kind == LanguageKind::Custom
    }
}

impl fmt::Display for ActiveLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (column {})", self.tag, self.column)
    }
}
