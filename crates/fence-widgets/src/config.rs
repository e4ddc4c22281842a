#![forbid(unsafe_code)]

//! Field construction parameters.
//!
//! # Environment Variables
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `FENCE_TEXT` | initial content (secret fields only) | empty |
//! | `FENCE_COLUMNS` | non-negative integer | `0` |
//! | `FENCE_MAX_LENGTH` | non-negative integer, `0` = unbounded | `0` |
//! | `FENCE_INPUT_TYPE` | `none`, `integer`, `signed-integer`, `decimal`, `signed-decimal`, `email`, `date`, `time`, `word` | `none` |
//!
//! Unparseable values are reported in [`FieldConfigParse::errors`] and leave
//! the default in place. An unknown input type degrades to `none`.

use std::env;
use std::fmt;

use fence_validation::InputType;

const ENV_TEXT: &str = "FENCE_TEXT";
const ENV_COLUMNS: &str = "FENCE_COLUMNS";
const ENV_MAX_LENGTH: &str = "FENCE_MAX_LENGTH";
const ENV_INPUT_TYPE: &str = "FENCE_INPUT_TYPE";

/// Everything a field needs at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldConfig {
    /// Initial content, checked like typed input.
    pub text: String,
    /// Preferred visible width (0 = unspecified).
    pub columns: usize,
    /// Length bound in chars (0 = unbounded).
    pub max_length: usize,
    /// Named input rule. Ignored by secret fields.
    pub input_type: InputType,
}

impl FieldConfig {
    /// Set the initial content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the preferred visible width.
    #[must_use]
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Set the length bound.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the input rule.
    #[must_use]
    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Read configuration from the process environment, dropping diagnostics.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env_with_diagnostics() -> FieldConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Read configuration through `get`, which maps a variable name to its
    /// value.
    pub fn from_env_with<F>(mut get: F) -> FieldConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_TEXT) {
            config.text = value;
        }

        if let Some(value) = get(ENV_COLUMNS) {
            match parse_usize(&value) {
                Some(parsed) => config.columns = parsed,
                None => errors.push(ConfigError::new(
                    "columns",
                    value,
                    "expected non-negative integer",
                )),
            }
        }

        if let Some(value) = get(ENV_MAX_LENGTH) {
            match parse_usize(&value) {
                Some(parsed) => config.max_length = parsed,
                None => errors.push(ConfigError::new(
                    "max_length",
                    value,
                    "expected non-negative integer (0 = unbounded)",
                )),
            }
        }

        if let Some(value) = get(ENV_INPUT_TYPE) {
            match value.parse::<InputType>() {
                Ok(parsed) => config.input_type = parsed,
                Err(err) => {
                    errors.push(ConfigError::new("input_type", value, err.to_string()));
                }
            }
        }

        FieldConfigParse { config, errors }
    }
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

/// Configuration plus whatever went wrong reading it.
#[derive(Debug, Clone)]
pub struct FieldConfigParse {
    /// The configuration, with defaults where a value was unusable.
    pub config: FieldConfig,
    /// One entry per rejected variable.
    pub errors: Vec<ConfigError>,
}

/// A configuration value that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Config field the value was meant for.
    pub field: &'static str,
    /// The raw value.
    pub value: String,
    /// What was expected.
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> FieldConfigParse {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FieldConfig::from_env_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_env_is_default() {
        let parsed = parse(&[]);
        assert_eq!(parsed.config, FieldConfig::default());
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn reads_every_variable() {
        let parsed = parse(&[
            ("FENCE_TEXT", "42"),
            ("FENCE_COLUMNS", "20"),
            ("FENCE_MAX_LENGTH", " 8 "),
            ("FENCE_INPUT_TYPE", "signed_integer"),
        ]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(
            parsed.config,
            FieldConfig::default()
                .with_text("42")
                .with_columns(20)
                .with_max_length(8)
                .with_input_type(InputType::SignedInteger)
        );
    }

    #[test]
    fn bad_values_are_reported_and_defaulted() {
        let parsed = parse(&[
            ("FENCE_MAX_LENGTH", "-3"),
            ("FENCE_COLUMNS", "wide"),
            ("FENCE_INPUT_TYPE", "phone"),
        ]);
        assert_eq!(parsed.config, FieldConfig::default());
        let fields: Vec<_> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["columns", "max_length", "input_type"]);
        assert_eq!(
            parsed.errors[1].to_string(),
            "max_length=-3 (expected non-negative integer (0 = unbounded))"
        );
    }
}
