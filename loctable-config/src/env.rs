// Environment variable loading

use crate::Result;
use std::collections::HashMap;
use std::env;

/// Prefix used for localizer settings, e.g. `LOCTABLE_DEFAULT_LANGUAGE`.
pub const ENV_PREFIX: &str = "LOCTABLE";

/// Environment variable loader
///
/// Variable names are mapped to configuration keys by stripping the prefix and
/// converting the rest to camelCase: `LOCTABLE_TABLE_PATH` becomes `tablePath`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Collect all variables under the prefix as configuration keys.
    pub fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self.collect(env::vars()))
    }

    fn collect(&self, vars: impl Iterator<Item = (String, String)>) -> HashMap<String, String> {
        let mut config = HashMap::new();

        for (key, value) in vars {
            let name = match self.prefix {
                Some(ref prefix) => match key.strip_prefix(prefix.as_str()) {
                    Some(rest) if rest.starts_with('_') => rest.trim_start_matches('_'),
                    _ => continue,
                },
                None => key.as_str(),
            };
            if name.is_empty() {
                continue;
            }
            config.insert(to_camel_case(name), value);
        }

        config
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(ENV_PREFIX.to_string()))
    }
}

/// `DEFAULT_LANGUAGE` -> `defaultLanguage`
pub(crate) fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
        let lower = part.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Iterator<Item = (String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_camel_case_mapping() {
        assert_eq!(to_camel_case("DELIMITER"), "delimiter");
        assert_eq!(to_camel_case("DEFAULT_LANGUAGE"), "defaultLanguage");
        assert_eq!(to_camel_case("TEXT__QUALIFIER"), "textQualifier");
    }

    #[test]
    fn test_collect_filters_by_prefix() {
        let loader = EnvLoader::default();
        let collected = loader.collect(vars(&[
            ("LOCTABLE_TABLE_PATH", "strings.csv"),
            ("LOCTABLEX_OTHER", "ignored"),
            ("PATH", "/usr/bin"),
            ("LOCTABLE_", "ignored"),
        ]));

        assert_eq!(collected.len(), 1);
        assert_eq!(collected.get("tablePath").map(String::as_str), Some("strings.csv"));
    }

    #[test]
    fn test_collect_without_prefix_keeps_every_variable() {
        let loader = EnvLoader::new(None);
        let collected = loader.collect(vars(&[("DEFAULT_LANGUAGE", "Polish")]));

        assert_eq!(
            collected.get("defaultLanguage").map(String::as_str),
            Some("Polish")
        );
    }
}
