// loctable - CSV-backed localization for Rust
//
// This library resolves (row, language) pairs in a CSV translation table to
// display strings, with placeholder substitution, caching and text bindings
// that follow the selected language.

// Re-export the lookup engine
pub use loctable_i18n::*;

// Re-export member crates
pub use loctable_config as config;
pub use loctable_i18n as i18n;
pub use loctable_log as log;
pub use loctable_table as table;

pub use loctable_config::{ConfigManager, FontMapping, LanguageColumn};
pub use loctable_table::{
    CsvDialect, CsvParser, FileSource, MemorySource, TableSource, ValidationFinding,
};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ActiveLanguage,
        ArgValue,
        ConfigManager,
        FileSelectionStore,
        FileSource,
        LanguageColumn,
        LocalizationError,
        Localizer,
        LocalizerConfig,
        MemorySelectionStore,
        MemorySource,
        Refresh,
        Result,
        SelectionStore,
        TableSource,
        TextTarget,
        args,
    };
}
