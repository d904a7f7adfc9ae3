use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Stores user-configurable preferences for the ExpenseFlow shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// Balances within this distance of zero count as settled.
    #[serde(default = "Config::default_settlement_tolerance")]
    pub settlement_tolerance: f64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory for exports. Defaults to `~/Documents`.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency_symbol: Self::default_currency_symbol(),
            settlement_tolerance: Self::default_settlement_tolerance(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            export_dir: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`].
    pub const KEYS: [&'static str; 5] = [
        "locale",
        "currency_symbol",
        "settlement_tolerance",
        "ui_color_enabled",
        "export_dir",
    ];

    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_settlement_tolerance() -> f64 {
        0.01
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }

        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.settlement_tolerance.is_finite() || self.settlement_tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "settlement_tolerance must be a positive number, got {}",
                self.settlement_tolerance
            )));
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "currency_symbol must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Updates one setting from its textual form. The config is left
    /// untouched when the value does not parse or validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut updated = self.clone();
        let value = value.trim();
        match key {
            "locale" => updated.locale = value.to_string(),
            "currency_symbol" => updated.currency_symbol = value.to_string(),
            "settlement_tolerance" => {
                updated.settlement_tolerance = value.parse().map_err(|_| {
                    ConfigError::Invalid(format!("`{}` is not a number", value))
                })?;
            }
            "ui_color_enabled" => {
                updated.ui_color_enabled = parse_bool(value)?;
            }
            "export_dir" => {
                updated.export_dir = if value.is_empty() || value == "default" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown setting `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Textual value of one setting, for display.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "locale" => Some(self.locale.clone()),
            "currency_symbol" => Some(self.currency_symbol.clone()),
            "settlement_tolerance" => Some(self.settlement_tolerance.to_string()),
            "ui_color_enabled" => Some(self.ui_color_enabled.to_string()),
            "export_dir" => Some(self.resolve_export_dir().display().to_string()),
            _ => None,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(ConfigError::Invalid(format!(
            "`{}` is not a boolean",
            other
        ))),
    }
}
