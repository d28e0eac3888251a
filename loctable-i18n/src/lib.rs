//! Localized text lookup for loctable
//!
//! Resolves (row, language) pairs in a CSV translation table to strings:
//!
//! - **Language Resolution**: fixed languages by name, any other header
//!   column by exact or partial free-text match
//! - **Placeholders**: ordered `{...}` tokens replaced by position
//! - **Caching**: raw cells and substituted texts, cleared together on
//!   language change or reload
//! - **Bindings**: external text targets re-filled on every language change
//! - **Persistence**: the selected language survives restarts
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loctable_i18n::prelude::*;
//!
//! let localizer = Localizer::from_config(
//!     LocalizerConfig::default().with_table_path("LocalizationFolder/strings.csv"),
//! )?;
//! localizer.initialize()?;
//!
//! // Plain text, by row or by key
//! let title = localizer.get_text(3);
//! let play = localizer.get_text_by_key("main_menu_play");
//!
//! // With placeholders
//! let coins = localizer.replace_placeholders_by_key("coins", &args![player, 100]);
//!
//! // Keep a label in sync with the selected language
//! localizer.bind_static_by_key(&label, "settings_title")?;
//! localizer.change_language("German")?;
//! ```

mod binding;
mod cache;
mod error;
mod font;
mod language;
mod localizer;
mod placeholder;
mod resolver;
mod store;

pub use binding::{BindingKind, TextTarget};
pub use cache::{CacheStats, CellKey, FormattedKey, LookupCache};
pub use error::LocalizationError;
pub use font::FontTable;
pub use language::{ActiveLanguage, FixedLanguage, LanguageKind, LanguageMap};
pub use localizer::{Localizer, LocalizerBuilder};
pub use placeholder::{ArgValue, ArgumentSignature, PlaceholderSubstitutor};
pub use resolver::{HeaderMatch, LanguageResolver};
pub use store::{FileSelectionStore, MemorySelectionStore, SavedLanguage, SelectionStore};

pub use loctable_config::LocalizerConfig;
pub use loctable_table::Refresh;

/// Result type for localization operations
pub type Result<T> = std::result::Result<T, LocalizationError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ActiveLanguage, ArgValue, FileSelectionStore, LocalizationError, Localizer,
        LocalizerConfig, MemorySelectionStore, Refresh, Result, SelectionStore, TextTarget, args,
    };
}
