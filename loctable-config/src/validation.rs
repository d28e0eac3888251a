// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate a character used to structure CSV text.
    ///
    /// Line breaks are reserved for row boundaries.
    pub fn is_field_separator(value: char, field: &str) -> Result<()> {
        if value == '\n' || value == '\r' {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be a line break",
                field
            )));
        }
        Ok(())
    }
}
