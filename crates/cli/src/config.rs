use std::env;

use crate::OutputFormat;

/// Settings read from the environment (and an optional `.env` file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub log_level: String,
    pub output: OutputFormat,
    pub currency_symbol: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            output: OutputFormat::Text,
            currency_symbol: "€".to_string(),
        }
    }
}

impl CliConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("TERMICO_LOG_LEVEL").unwrap_or(defaults.log_level);
        let output = match lookup("TERMICO_OUTPUT") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                _ => return Err(ConfigError::InvalidOutput { value }),
            },
            None => defaults.output,
        };
        let currency_symbol =
            lookup("TERMICO_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol);

        Ok(Self {
            log_level,
            output,
            currency_symbol,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TERMICO_OUTPUT must be 'text' or 'json', got '{value}'")]
    InvalidOutput { value: String },
}
