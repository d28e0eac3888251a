//! The Localizer
//!
//! Owns the table, both lookup caches, the bindings and the persisted
//! selection behind one reader-writer lock. Lookups share the lock;
//! initialization, language changes and reloads take it exclusively.
//!
//! Binding targets are called after the lock is released, so a target may
//! call back into the localizer.

use crate::binding::{BindingKind, BindingRegistry, TextTarget, target_id};
use crate::cache::{CacheStats, CellKey, FormattedKey, LookupCache};
use crate::font::FontTable;
use crate::language::{ActiveLanguage, LanguageMap};
use crate::placeholder::{ArgValue, ArgumentSignature, PlaceholderSubstitutor};
use crate::resolver::LanguageResolver;
use crate::store::{FileSelectionStore, SelectionStore};
use crate::{LocalizationError, Result};
use loctable_config::{LocalizerConfig, Validate};
use loctable_log::{debug, error, info, warn};
use loctable_table::{
    CsvDialect, CsvParser, FileSource, Refresh, TableCache, TableError, TableSource,
    ValidationFinding,
};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::fmt;
use std::sync::{Arc, Weak};

/// Builder for [`Localizer`].
///
/// Without an explicit source the table is read from `tablePath`; without an
/// explicit store the selection is kept in the JSON file at `statePath`.
pub struct LocalizerBuilder {
    config: LocalizerConfig,
    source: Option<Arc<dyn TableSource>>,
    store: Option<Arc<dyn SelectionStore>>,
}

impl LocalizerBuilder {
    pub fn new() -> Self {
        Self {
            config: LocalizerConfig::default(),
            source: None,
            store: None,
        }
    }

    pub fn config(mut self, config: LocalizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(self, source: impl TableSource + 'static) -> Self {
        self.shared_source(Arc::new(source))
    }

    /// Use a source the caller keeps a handle to.
    pub fn shared_source(mut self, source: Arc<dyn TableSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn store(self, store: impl SelectionStore + 'static) -> Self {
        self.shared_store(Arc::new(store))
    }

    /// Use a store the caller keeps a handle to.
    pub fn shared_store(mut self, store: Arc<dyn SelectionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate the configuration and assemble the localizer.
    ///
    /// Nothing is read yet: the table loads on first use or on
    /// [`Localizer::initialize`].
    pub fn build(self) -> Result<Localizer> {
        let config = self.config;
        config.validate()?;

        let source: Arc<dyn TableSource> = match (self.source, &config.table_path) {
            (Some(source), _) => source,
            (None, Some(path)) => Arc::new(FileSource::new(path.clone())),
            (None, None) => {
                return Err(TableError::SourceUnavailable(
                    "no table source given and no tablePath configured".to_string(),
                )
                .into());
            }
        };
        let store: Arc<dyn SelectionStore> = match self.store {
            Some(store) => store,
            None => Arc::new(FileSelectionStore::new(config.state_path.clone())),
        };

        let languages = LanguageMap::from_columns(&config.languages);
        let parser = CsvParser::new(
            CsvDialect::new(config.delimiter).with_qualifier(config.text_qualifier),
        );
        let table = TableCache::new(parser).with_fixed_columns(languages.columns());
        let fonts = FontTable::new(config.default_font.clone(), config.language_fonts.clone());

        debug!(
            target: "loctable::i18n",
            "Localizer for {} with {} fixed languages, selection in {:?}",
            source.name(),
            languages.len(),
            store
        );

        Ok(Localizer {
            state: Arc::new(RwLock::new(State {
                default_language: config.default_language.trim().to_string(),
                languages,
                fonts,
                source,
                store,
                table,
                active: None,
                persisted: None,
                initialized: false,
                load_failed: false,
                caches: Mutex::new(LookupCache::new()),
                bindings: BindingRegistry::default(),
            })),
        })
    }
}

impl Default for LocalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Text lookups over a CSV translation table.
///
/// Cloning is cheap; clones share all state.
///
/// # Examples
///
/// ```rust
/// use loctable_i18n::prelude::*;
/// use loctable_table::MemorySource;
///
/// let localizer = Localizer::builder()
///     .source(MemorySource::new("strings", "key;desc;English;Chinese\ngreet;;Hello;你好\n"))
///     .store(MemorySelectionStore::new())
///     .build()?;
///
/// localizer.initialize()?;
/// assert_eq!(localizer.get_text_by_key("greet"), "Hello");
///
/// localizer.change_language("chinese")?;
/// assert_eq!(localizer.get_text(1), "你好");
/// # Ok::<(), LocalizationError>(())
/// ```
#[derive(Clone)]
pub struct Localizer {
    state: Arc<RwLock<State>>,
}

impl Localizer {
    pub fn builder() -> LocalizerBuilder {
        LocalizerBuilder::new()
    }

    /// Build from configuration alone, reading `tablePath` and `statePath`.
    pub fn from_config(config: LocalizerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Load the table and restore the persisted language.
    ///
    /// When nothing was saved the default language is saved; when the saved
    /// language no longer resolves the default is used instead. Targets bound
    /// before initialization receive text. Further calls do nothing.
    pub fn initialize(&self) -> Result<()> {
        let delivery = {
            let mut state = self.state.write();
            if state.initialized {
                debug!(target: "loctable::i18n", "Localizer already initialized");
                return Ok(());
            }

            if let Err(e) = state.sync_table() {
                warn!(target: "loctable::i18n", "Initializing without a table: {}", e);
            }

            let saved = state.store.load().unwrap_or_else(|e| {
                warn!(target: "loctable::i18n", "Could not read saved language: {}", e);
                None
            });
            let tag = match saved {
                Some(tag) => {
                    state.persisted = Some(tag.clone());
                    tag
                }
                None => {
                    let tag = state.default_language.clone();
                    state.persist(&tag);
                    info!(
                        target: "loctable::i18n",
                        "No saved language found, default language set: {}",
                        tag
                    );
                    tag
                }
            };
            info!(target: "loctable::i18n", "Language loaded: {}", tag);

            let language = match state.resolve(&tag) {
                Some(language) => language,
                None => {
                    let default = state.default_language.clone();
                    warn!(
                        target: "loctable::i18n",
                        "Saved language '{}' not found, falling back to '{}'",
                        tag,
                        default
                    );
                    match state.resolve(&default) {
                        Some(language) => language,
                        None => {
                            error!(
                                target: "loctable::i18n",
                                "Default language '{}' not found in CSV headers",
                                default
                            );
                            return Err(LocalizationError::LanguageNotFound(default));
                        }
                    }
                }
            };

            state.activate(language);
            state.initialized = true;
            state.collect_delivery()
        };

        delivery.send();
        Ok(())
    }

    /// Switch to a fixed language by name or to any header column by
    /// free-text name, then push fresh text into every bound target.
    ///
    /// The selection is persisted when it differs from the saved one.
    pub fn change_language(&self, language: &str) -> Result<()> {
        let language = language.trim();
        if language.is_empty() {
            error!(target: "loctable::i18n", "Language name cannot be empty");
            return Err(LocalizationError::EmptyLanguageName);
        }

        let delivery = {
            let mut state = self.state.write();
            // A missing table still allows switching between fixed languages.
            let _ = state.sync_table();

            let Some(resolved) = state.resolve(language) else {
                error!(
                    target: "loctable::i18n",
                    "Language '{}' not found in CSV headers",
                    language
                );
                return Err(LocalizationError::LanguageNotFound(language.to_string()));
            };

            if resolved.is_custom() {
                info!(
                    target: "loctable::i18n",
                    "Changed to custom language '{}' at column index {}",
                    resolved.tag,
                    resolved.column
                );
            }

            state.activate(resolved);
            state.collect_delivery()
        };

        delivery.send();
        Ok(())
    }

    /// Re-parse the table if its source changed.
    ///
    /// On change the caches are cleared and bound targets receive fresh text.
    pub fn refresh(&self) -> Result<Refresh> {
        self.update_table(State::sync_table)
    }

    /// Re-parse the table unconditionally.
    pub fn reload(&self) -> Result<Refresh> {
        self.update_table(State::reload_table)
    }

    fn update_table(&self, update: fn(&mut State) -> Result<Refresh>) -> Result<Refresh> {
        let (refresh, delivery) = {
            let mut state = self.state.write();
            let refresh = update(&mut *state)?;
            state.prepare();
            let delivery = (refresh == Refresh::Reloaded).then(|| state.collect_delivery());
            (refresh, delivery)
        };

        if let Some(delivery) = delivery {
            delivery.send();
        }
        Ok(refresh)
    }

    /// Cell at (`row`, `column`), or empty when out of range.
    pub fn get_cell(&self, row: usize, column: usize) -> String {
        self.ready().cell(row, column)
    }

    /// Cell of `row` in the active language.
    pub fn get_text(&self, row: usize) -> String {
        self.ready().text(row)
    }

    /// Text of the row whose column 0 equals `key`, or empty.
    pub fn get_text_by_key(&self, key: &str) -> String {
        let state = self.ready();
        state
            .row_for_key(key)
            .map(|row| state.text(row))
            .unwrap_or_default()
    }

    pub fn find_row_by_key(&self, key: &str) -> Option<usize> {
        LanguageResolver::find_row_by_key(self.ready().table.table(), key)
    }

    /// Text of `row` with its `{...}` tokens replaced by `args` in order.
    pub fn replace_placeholders(&self, row: usize, args: &[ArgValue]) -> String {
        self.ready().formatted(row, args)
    }

    pub fn replace_placeholders_by_key(&self, key: &str, args: &[ArgValue]) -> String {
        let state = self.ready();
        state
            .row_for_key(key)
            .map(|row| state.formatted(row, args))
            .unwrap_or_default()
    }

    /// Show `row` in `target` now and after every language change.
    ///
    /// Binding a target again replaces its previous binding.
    pub fn bind_static<T: TextTarget + 'static>(&self, target: &Arc<T>, row: usize) {
        self.bind(target, row, BindingKind::Static);
    }

    pub fn bind_static_by_key<T: TextTarget + 'static>(
        &self,
        target: &Arc<T>,
        key: &str,
    ) -> Result<()> {
        let row = self.ready().row_for_key(key)?;
        self.bind_static(target, row);
        Ok(())
    }

    /// Like [`bind_static`](Self::bind_static), re-substituting `args` into
    /// the new language's text on every change.
    pub fn bind_dynamic<T: TextTarget + 'static>(
        &self,
        target: &Arc<T>,
        row: usize,
        args: &[ArgValue],
    ) {
        self.bind(target, row, BindingKind::Dynamic(args.to_vec()));
    }

    pub fn bind_dynamic_by_key<T: TextTarget + 'static>(
        &self,
        target: &Arc<T>,
        key: &str,
        args: &[ArgValue],
    ) -> Result<()> {
        let row = self.ready().row_for_key(key)?;
        self.bind_dynamic(target, row, args);
        Ok(())
    }

    fn bind<T: TextTarget + 'static>(&self, target: &Arc<T>, row: usize, kind: BindingKind) {
        let weak: Weak<T> = Arc::downgrade(target);
        let weak: Weak<dyn TextTarget> = weak;
        let (text, font) = {
            let mut state = self.state.write();
            state.prepare();
            state.bind(target_id(target), weak, row, kind)
        };

        if !text.is_empty() {
            target.set_text(&text, font.as_deref());
        }
    }

    /// Stop pushing text into `target`. Returns whether it was bound.
    pub fn unbind<T: ?Sized>(&self, target: &Arc<T>) -> bool {
        self.state.write().bindings.remove(target_id(target))
    }

    /// Text most recently pushed to `target`.
    pub fn bound_text<T: ?Sized>(&self, target: &Arc<T>) -> Option<String> {
        self.state
            .read()
            .bindings
            .last_text(target_id(target))
            .map(str::to_string)
    }

    /// Number of bindings whose target is still alive.
    pub fn binding_count(&self) -> usize {
        let mut state = self.state.write();
        state.bindings.prune();
        state.bindings.len()
    }

    /// Tag of the active language, or the default before any lookup.
    pub fn current_language_tag(&self) -> String {
        self.state.read().active_tag().to_string()
    }

    pub fn current_language(&self) -> Option<ActiveLanguage> {
        self.state.read().active.clone()
    }

    /// Font key for the active language.
    pub fn current_font_selector(&self) -> Option<String> {
        let state = self.state.read();
        state.fonts.select(state.active_tag())
    }

    /// Non-blank header names inside the translation column range.
    pub fn available_languages(&self) -> Vec<String> {
        let state = self.ready();
        let range = state.table.column_range();
        state
            .table
            .table()
            .header()
            .iter()
            .enumerate()
            .filter(|(column, _)| range.contains(*column))
            .map(|(_, name)| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validator findings of the most recent parse.
    pub fn diagnostics(&self) -> Vec<ValidationFinding> {
        self.ready().table.findings().to_vec()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.state.read().caches.lock().stats()
    }

    /// How many times the table has been parsed.
    pub fn parse_count(&self) -> u64 {
        self.state.read().table.parse_count()
    }

    /// Shared access with the table loaded and a language selected.
    fn ready(&self) -> RwLockReadGuard<'_, State> {
        {
            let state = self.state.read();
            if state.is_ready() {
                return state;
            }
        }
        self.state.write().prepare();
        self.state.read()
    }
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Localizer")
            .field("source", &state.source.name())
            .field("language", &state.active)
            .field("initialized", &state.initialized)
            .finish()
    }
}

struct State {
    default_language: String,
    languages: LanguageMap,
    fonts: FontTable,
    source: Arc<dyn TableSource>,
    store: Arc<dyn SelectionStore>,
    table: TableCache,
    /// First load failed; lookups stop retrying until an explicit sync
    load_failed: bool,
    active: Option<ActiveLanguage>,
    /// Tag known to be in the store
    persisted: Option<String>,
    initialized: bool,
    caches: Mutex<LookupCache>,
    bindings: BindingRegistry,
}

/// Text waiting to be pushed once the lock is released.
struct Delivery {
    font: Option<String>,
    items: Vec<(Arc<dyn TextTarget>, String)>,
}

impl Delivery {
    fn send(self) {
        for (target, text) in &self.items {
            target.set_text(text, self.font.as_deref());
        }
    }
}

impl State {
    fn is_ready(&self) -> bool {
        (self.table.is_loaded() || self.load_failed) && self.active.is_some()
    }

    /// Load the table on first use and settle on a language.
    fn prepare(&mut self) {
        if !self.table.is_loaded() && !self.load_failed {
            // Failures are logged by the table cache; lookups then read empty.
            let _ = self.sync_table();
        }
        if self.active.is_none() {
            self.active = Some(self.fallback_language());
        }
    }

    fn sync_table(&mut self) -> Result<Refresh> {
        let refresh = self.table.ensure_fresh(self.source.as_ref());
        self.load_failed = !self.table.is_loaded();
        let refresh = refresh?;
        if refresh == Refresh::Reloaded {
            self.table_changed();
        }
        Ok(refresh)
    }

    fn reload_table(&mut self) -> Result<Refresh> {
        let refresh = self.table.reload(self.source.as_ref());
        self.load_failed = !self.table.is_loaded();
        let refresh = refresh?;
        self.table_changed();
        Ok(refresh)
    }

    fn table_changed(&mut self) {
        self.caches.get_mut().clear();

        // Custom languages follow their header when columns move.
        let Some(tag) = self
            .active
            .as_ref()
            .filter(|a| a.is_custom())
            .map(|a| a.tag.clone())
        else {
            return;
        };

        match self.resolve(&tag) {
            Some(resolved) => {
                if self.active.as_ref() != Some(&resolved) {
                    info!(target: "loctable::i18n", "Language '{}' now at {}", tag, resolved);
                    self.active = Some(resolved);
                }
            }
            None => warn!(
                target: "loctable::i18n",
                "Language '{}' no longer found in CSV headers, keeping its column",
                tag
            ),
        }
    }

    fn resolve(&self, identifier: &str) -> Option<ActiveLanguage> {
        LanguageResolver::resolve(identifier, &self.languages, self.table.table().header())
    }

    fn fallback_language(&self) -> ActiveLanguage {
        if let Some(language) = self.resolve(&self.default_language) {
            return language;
        }

        if let Some(first) = self.languages.iter().next() {
            error!(
                target: "loctable::i18n",
                "Default language '{}' not found, using '{}'",
                self.default_language,
                first.name
            );
            return ActiveLanguage::fixed(first);
        }

        let column = self.table.column_range().min;
        error!(
            target: "loctable::i18n",
            "Default language '{}' not found, reading column {}",
            self.default_language,
            column
        );
        ActiveLanguage::custom(self.default_language.clone(), column)
    }

    fn active_tag(&self) -> &str {
        self.active
            .as_ref()
            .map_or(self.default_language.as_str(), |a| a.tag.as_str())
    }

    fn active_column(&self) -> usize {
        self.active
            .as_ref()
            .map_or(self.table.column_range().min, |a| a.column)
    }

    fn activate(&mut self, language: ActiveLanguage) {
        self.caches.get_mut().sync_language(&language.tag);
        self.persist(&language.tag);
        self.active = Some(language);
    }

    /// Save `tag` unless the store already holds it.
    fn persist(&mut self, tag: &str) {
        if self.persisted.as_deref() == Some(tag) {
            return;
        }
        match self.store.save(tag) {
            Ok(()) => {
                self.persisted = Some(tag.to_string());
                info!(target: "loctable::i18n", "Language set: {}", tag);
            }
            Err(e) => error!(
                target: "loctable::i18n",
                "Failed to save language '{}': {}",
                tag,
                e
            ),
        }
    }

    fn row_for_key(&self, key: &str) -> Result<usize> {
        if key.trim().is_empty() {
            warn!(target: "loctable::i18n", "Key cannot be null or empty");
            return Err(LocalizationError::EmptyKey);
        }
        LanguageResolver::find_row_by_key(self.table.table(), key).ok_or_else(|| {
            warn!(
                target: "loctable::i18n",
                "Key '{}' not found in the first column",
                key
            );
            LocalizationError::KeyNotFound(key.to_string())
        })
    }

    fn cell(&self, row: usize, column: usize) -> String {
        let key = CellKey { row, column };
        let mut caches = self.caches.lock();
        caches.sync_language(self.active_tag());
        if let Some(value) = caches.cell(key) {
            return value;
        }

        let value = self.table.table().cell_or_empty(row, column).to_string();
        caches.insert_cell(key, value.clone());
        value
    }

    fn text(&self, row: usize) -> String {
        self.cell(row, self.active_column())
    }

    fn formatted(&self, row: usize, args: &[ArgValue]) -> String {
        let key = FormattedKey {
            row,
            language: self.active_tag().to_string(),
            signature: ArgumentSignature::of(args),
        };
        {
            let mut caches = self.caches.lock();
            caches.sync_language(&key.language);
            if let Some(value) = caches.formatted(&key) {
                return value;
            }
        }

        let text = self.text(row);
        if text.is_empty() {
            return text;
        }

        let formatted = PlaceholderSubstitutor::apply(&text, args);
        self.caches.lock().insert_formatted(key, formatted.clone());
        formatted
    }

    fn render(&self, row: usize, kind: &BindingKind) -> String {
        match kind {
            BindingKind::Static => self.text(row),
            BindingKind::Dynamic(args) => self.formatted(row, args),
        }
    }

    fn bind(
        &mut self,
        id: usize,
        target: Weak<dyn TextTarget>,
        row: usize,
        kind: BindingKind,
    ) -> (String, Option<String>) {
        let text = self.render(row, &kind);
        self.bindings.upsert(id, target, row, kind, text.clone());
        (text, self.fonts.select(self.active_tag()))
    }

    fn collect_delivery(&mut self) -> Delivery {
        let font = self.fonts.select(self.active_tag());
        let live = self.bindings.live();

        let mut items = Vec::with_capacity(live.len());
        for binding in live {
            let text = self.render(binding.row, &binding.kind);
            self.bindings.record_text(binding.id, &text);
            items.push((binding.target, text));
        }

        if !items.is_empty() {
            debug!(target: "loctable::i18n", "Refreshing {} bound texts", items.len());
        }
        Delivery { font, items }
    }
}
