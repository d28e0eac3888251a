//! Configuration for the loctable localization engine
//!
//! Settings are layered: defaults, then files (JSON, TOML or `.env`), then
//! `LOCTABLE_*` environment variables. The merged layers deserialize into a
//! validated [`LocalizerConfig`].
//!
//! ```rust,ignore
//! use loctable_config::ConfigManager;
//!
//! let manager = ConfigManager::new();
//! manager.load_file("localization.toml")?;
//! manager.load_env()?;
//! let config = manager.localizer_config()?;
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::{ENV_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{FontMapping, LanguageColumn, LocalizerConfig, default_languages};
pub use validation::{ConfigValidator, Validate};

use loctable_log::{debug, info};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Layered configuration store.
///
/// Later layers override earlier ones key by key.
#[derive(Clone)]
pub struct ConfigManager {
    values: Arc<RwLock<Map<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    /// Create a manager reading `LOCTABLE_*` variables
    pub fn new() -> Self {
        Self::with_prefix(ENV_PREFIX)
    }

    /// Create with a custom environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            values: Arc::new(RwLock::new(Map::new())),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Overlay environment variables
    pub fn load_env(&self) -> Result<()> {
        let loader = EnvLoader::new(self.env_prefix.clone());
        let env_vars = loader.load()?;

        let mut values = self.values.write();
        for (key, value) in env_vars {
            debug!(target: "loctable::config", "env override: {}", key);
            values.insert(key, Value::String(value));
        }

        Ok(())
    }

    /// Read a `.env` file into the process environment, then overlay it
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok();
        }
        self.load_env()
    }

    /// Overlay a configuration file, detecting the format from its extension
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let data = loader.load_file(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let is_env = FileFormat::from_extension(extension) == Some(FileFormat::Env);

        let Value::Object(map) = data else {
            return Err(ConfigError::ParseError(format!(
                "{} does not contain a table of settings",
                path.display()
            )));
        };

        let mut values = self.values.write();
        for (key, value) in map {
            let key = if is_env {
                self.env_key(&key)
            } else if key.contains('_') {
                // snake_case spelling of a camelCase setting
                env::to_camel_case(&key)
            } else {
                key
            };
            values.insert(key, value);
        }

        info!(target: "loctable::config", "Loaded configuration from {}", path.display());
        Ok(())
    }

    fn env_key(&self, raw: &str) -> String {
        let name = self
            .env_prefix
            .as_deref()
            .and_then(|prefix| raw.strip_prefix(prefix))
            .map(|rest| rest.trim_start_matches('_'))
            .unwrap_or(raw);
        env::to_camel_case(name)
    }

    /// Set a configuration value
    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        self.values.write().insert(key.to_string(), json_value);
        Ok(())
    }

    /// Deserialize all layers into `T` and validate it
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let merged = Value::Object(self.values.read().clone());

        let validated: T = serde_json::from_value(merged)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        validated.validate()?;
        Ok(validated)
    }

    /// The merged, validated localizer settings
    pub fn localizer_config(&self) -> Result<LocalizerConfig> {
        self.load_validated()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overrides_a_setting() {
        let manager = ConfigManager::new();
        manager.set("defaultLanguage", "German").unwrap();

        let config = manager.localizer_config().unwrap();
        assert_eq!(config.default_language, "German");
    }

    #[test]
    fn test_empty_layers_yield_defaults() {
        let config = ConfigManager::new().localizer_config().unwrap();
        assert_eq!(config, LocalizerConfig::default());
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let manager = ConfigManager::new();
        manager.set("delimiter", "\"").unwrap();

        assert!(matches!(
            manager.localizer_config(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_file_keys_are_mapped() {
        let manager = ConfigManager::new();
        assert_eq!(manager.env_key("LOCTABLE_DEFAULT_LANGUAGE"), "defaultLanguage");
        assert_eq!(manager.env_key("TABLE_PATH"), "tablePath");
    }
}
