//! Basic lookup example
//!
//! Loads an in-memory translation table, binds a label and switches
//! languages.
//!
//! Run with: cargo run --example basic_lookup
//! Debug output: LOCTABLE_LOG_LEVEL=debug cargo run --example basic_lookup

use loctable::prelude::*;
use std::sync::Arc;

const STRINGS: &str = "\
key;desc;English;German;Français (Canada)
greeting;Title screen;\"Welcome, {player}!\";Willkommen, {player}!;Bienvenue, {player} !
quit;Menu;Quit;Beenden;Quitter
";

fn main() -> loctable::Result<()> {
    loctable::log::init();

    let localizer = Localizer::builder()
        .config(
            LocalizerConfig::default()
                .with_languages(vec![
                    LanguageColumn::new("English", 2),
                    LanguageColumn::new("German", 3),
                ])
                .with_default_font("Roboto"),
        )
        .source(MemorySource::new("strings.csv", STRINGS))
        .store(MemorySelectionStore::new())
        .build()?;
    localizer.initialize()?;

    println!("Available languages: {:?}", localizer.available_languages());

    let title = Arc::new(|text: &str, font: Option<&str>| {
        println!("[title | {}] {}", font.unwrap_or("-"), text);
    });
    localizer.bind_dynamic_by_key(&title, "greeting", &args!["Ada"])?;

    for language in ["German", "français"] {
        localizer.change_language(language)?;
        println!("{}: {}", language, localizer.get_text_by_key("quit"));
    }

    Ok(())
}
