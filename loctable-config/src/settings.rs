// Localizer settings model

use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// A fixed language bound to a table column by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageColumn {
    pub name: String,
    pub column: usize,
}

impl LanguageColumn {
    pub fn new(name: impl Into<String>, column: usize) -> Self {
        Self {
            name: name.into(),
            column,
        }
    }
}

/// Font key used while a given language is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontMapping {
    pub language: String,
    pub font: String,
}

impl FontMapping {
    pub fn new(language: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            font: font.into(),
        }
    }
}

/// Everything a `Localizer` needs besides the table itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizerConfig {
    /// Field delimiter of the CSV table
    pub delimiter: char,
    /// Quote character wrapping fields that contain delimiters or newlines
    #[serde(alias = "text_qualifier")]
    pub text_qualifier: char,
    /// CSV table on disk
    #[serde(alias = "table_path")]
    pub table_path: Option<PathBuf>,
    /// Where the selected language is persisted between sessions
    #[serde(alias = "state_path")]
    pub state_path: PathBuf,
    /// Language used on first launch and when the saved one no longer resolves
    #[serde(alias = "default_language")]
    pub default_language: String,
    /// Fixed languages and the columns they live in
    pub languages: Vec<LanguageColumn>,
    /// Font key for languages without a dedicated font
    #[serde(alias = "default_font")]
    pub default_font: Option<String>,
    /// Languages that need special glyph coverage
    #[serde(alias = "language_fonts")]
    pub language_fonts: Vec<FontMapping>,
}

pub const DEFAULT_DELIMITER: char = ';';
pub const DEFAULT_TEXT_QUALIFIER: char = '"';
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_STATE_PATH: &str = "LocalizationFolder/language_global.json";

/// Column layout shipped with the stock translation table: key, description,
/// then one column per language.
pub fn default_languages() -> Vec<LanguageColumn> {
    [
        "English",
        "Chinese",
        "Japanese",
        "German",
        "French",
        "Spanish",
        "Portuguese",
        "Italian",
        "Ukrainian",
        "Polish",
        "Turkish",
        "Korean",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| LanguageColumn::new(*name, i + 2))
    .collect()
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            text_qualifier: DEFAULT_TEXT_QUALIFIER,
            table_path: None,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            default_language: DEFAULT_LANGUAGE.to_string(),
            languages: default_languages(),
            default_font: None,
            language_fonts: Vec::new(),
        }
    }
}

impl LocalizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(path.into());
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Replace the fixed language set.
    pub fn with_languages(mut self, languages: Vec<LanguageColumn>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = Some(font.into());
        self
    }

    pub fn with_language_font(
        mut self,
        language: impl Into<String>,
        font: impl Into<String>,
    ) -> Self {
        self.language_fonts.push(FontMapping::new(language, font));
        self
    }
}

impl Validate for LocalizerConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_field_separator(self.delimiter, "delimiter")?;
        ConfigValidator::is_field_separator(self.text_qualifier, "textQualifier")?;
        if self.delimiter == self.text_qualifier {
            return Err(ConfigError::ValidationError(format!(
                "delimiter and textQualifier must differ (both are {:?})",
                self.delimiter
            )));
        }

        ConfigValidator::not_empty(self.default_language.trim(), "defaultLanguage")?;

        let mut seen = HashSet::new();
        for language in &self.languages {
            ConfigValidator::not_empty(language.name.trim(), "languages[].name")?;
            if !seen.insert(language.name.trim().to_lowercase()) {
                return Err(ConfigError::ValidationError(format!(
                    "language '{}' is listed more than once",
                    language.name
                )));
            }
        }

        for mapping in &self.language_fonts {
            ConfigValidator::not_empty(mapping.language.trim(), "languageFonts[].language")?;
            ConfigValidator::not_empty(mapping.font.trim(), "languageFonts[].font")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_table() {
        let config = LocalizerConfig::default();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.text_qualifier, '"');
        assert_eq!(config.default_language, "English");
        assert_eq!(config.languages.first(), Some(&LanguageColumn::new("English", 2)));
        assert_eq!(config.languages.last(), Some(&LanguageColumn::new("Korean", 13)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delimiter_equal_to_qualifier_is_rejected() {
        let config = LocalizerConfig::default().with_delimiter('"');
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_newline_delimiter_is_rejected() {
        let config = LocalizerConfig::default().with_delimiter('\n');
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_language_names_are_rejected() {
        let config = LocalizerConfig::default().with_languages(vec![
            LanguageColumn::new("English", 2),
            LanguageColumn::new("english", 3),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LocalizerConfig =
            serde_json::from_str(r#"{"delimiter": ",", "defaultLanguage": "German"}"#).unwrap();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.default_language, "German");
        assert_eq!(config.languages.len(), 12);
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_PATH));
    }

    #[test]
    fn test_snake_case_keys_are_accepted() {
        let config: LocalizerConfig = serde_json::from_str(
            r#"{"default_language": "German", "table_path": "strings.csv", "text_qualifier": "'"}"#,
        )
        .unwrap();

        assert_eq!(config.default_language, "German");
        assert_eq!(config.table_path, Some(PathBuf::from("strings.csv")));
        assert_eq!(config.text_qualifier, '\'');
    }
}
