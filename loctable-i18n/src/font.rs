//! Font selection
//!
//! Fonts are opaque keys. Applying them is the host's job.

use crate::language::eq_ignore_case;
use loctable_config::FontMapping;
use loctable_log::info;
use parking_lot::Mutex;

/// Per-language font keys with a fallback.
#[derive(Debug, Default)]
pub struct FontTable {
    default: Option<String>,
    fonts: Vec<FontMapping>,
    announced: Mutex<Option<Option<String>>>,
}

impl FontTable {
    pub fn new(default: Option<String>, fonts: Vec<FontMapping>) -> Self {
        Self {
            default,
            fonts: fonts
                .into_iter()
                .filter(|m| !m.language.trim().is_empty() && !m.font.trim().is_empty())
                .collect(),
            announced: Mutex::new(None),
        }
    }

    /// Font key for `language`, falling back to the default.
    pub fn lookup(&self, language: &str) -> Option<&str> {
        let language = language.trim();
        self.fonts
            .iter()
            .find(|m| eq_ignore_case(m.language.trim(), language))
            .map(|m| m.font.as_str())
            .or(self.default.as_deref())
    }

    /// Like [`lookup`](Self::lookup), logging whenever the selection differs
    /// from the previous call.
    pub fn select(&self, language: &str) -> Option<String> {
        let font = self.lookup(language).map(str::to_string);

        let mut announced = self.announced.lock();
        if announced.as_ref() != Some(&font) {
            info!(
                target: "loctable::i18n",
                "Current font for all available texts is set: {}",
                font.as_deref().unwrap_or("<none>")
            );
            *announced = Some(font.clone());
        }

        font
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FontTable {
        FontTable::new(
            Some("Roboto".to_string()),
            vec![
                FontMapping::new("Chinese", "NotoSansSC"),
                FontMapping::new("Korean", "NotoSansKR"),
                FontMapping::new("", "Ignored"),
            ],
        )
    }

    #[test]
    fn test_language_font_and_default() {
        let fonts = table();
        assert_eq!(fonts.lookup("chinese"), Some("NotoSansSC"));
        assert_eq!(fonts.lookup("Korean"), Some("NotoSansKR"));
        assert_eq!(fonts.lookup("English"), Some("Roboto"));
        assert_eq!(fonts.lookup(""), Some("Roboto"));
    }

    #[test]
    fn test_no_fonts_configured() {
        assert_eq!(FontTable::default().lookup("English"), None);
    }

    #[test]
    fn test_font_change_is_logged_once() {
        let fonts = table();
        let (_, records) = loctable_log::capture(|| {
            fonts.select("English");
            fonts.select("English");
            fonts.select("Chinese");
            fonts.select("Chinese");
        });

        let changes: Vec<_> = records
            .iter()
            .filter(|r| r.message.starts_with("Current font"))
            .collect();
        assert_eq!(changes.len(), 2);
        assert!(changes[1].message.ends_with("NotoSansSC"));
    }
}
