use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::ConfigError;

const MAX_PRECISION: u8 = 6;

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_precision")]
    pub precision: u8,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional store file location. Defaults to `store.json` under the app home.
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            precision: Self::default_precision(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            data_file: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_precision() -> u8 {
        2
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// Store file to open, relative paths resolved against `home`.
    /// A leading `~` expands to the user's home directory.
    pub fn resolve_data_file(&self, home: &Path, default_name: &str) -> PathBuf {
        let Some(path) = &self.data_file else {
            return home.join(default_name);
        };
        if let Ok(rest) = path.strip_prefix("~") {
            if let Some(user_home) = dirs::home_dir() {
                return user_home.join(rest);
            }
        }
        if path.is_absolute() {
            path.clone()
        } else {
            home.join(path)
        }
    }

    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::CurrencySymbol => self.currency_symbol.clone(),
            ConfigKey::Precision => self.precision.to_string(),
            ConfigKey::UiColorEnabled => self.ui_color_enabled.to_string(),
            ConfigKey::BackupRetention => self.backup_retention.to_string(),
            ConfigKey::DataFile => self
                .data_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Updates one field from its textual form. The config is unchanged on error.
    pub fn set(&mut self, key: ConfigKey, raw: &str) -> Result<(), ConfigError> {
        let value = raw.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.as_str(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            ConfigKey::CurrencySymbol => {
                if value.is_empty() {
                    return Err(invalid("symbol cannot be empty"));
                }
                self.currency_symbol = value.to_string();
            }
            ConfigKey::Precision => {
                let precision: u8 = value.parse().map_err(|_| invalid("expected a number"))?;
                if precision > MAX_PRECISION {
                    return Err(invalid("precision must be between 0 and 6"));
                }
                self.precision = precision;
            }
            ConfigKey::UiColorEnabled => {
                self.ui_color_enabled = parse_flag(value).ok_or_else(|| invalid("expected on/off"))?;
            }
            ConfigKey::BackupRetention => {
                let retention: usize = value.parse().map_err(|_| invalid("expected a number"))?;
                if retention == 0 {
                    return Err(invalid("at least one backup must be kept"));
                }
                self.backup_retention = retention;
            }
            ConfigKey::DataFile => {
                self.data_file = if value.is_empty() || value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }
}

/// Settable configuration fields, by their JSON names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CurrencySymbol,
    Precision,
    UiColorEnabled,
    BackupRetention,
    DataFile,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::CurrencySymbol,
        ConfigKey::Precision,
        ConfigKey::UiColorEnabled,
        ConfigKey::BackupRetention,
        ConfigKey::DataFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::CurrencySymbol => "currency_symbol",
            ConfigKey::Precision => "precision",
            ConfigKey::UiColorEnabled => "ui_color_enabled",
            ConfigKey::BackupRetention => "backup_retention",
            ConfigKey::DataFile => "data_file",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownKey(raw.trim().to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
