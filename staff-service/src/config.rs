use std::{env, path::Path};

use serde::Deserialize;

const DEFAULT_DATABASE_URL: &str = "sqlite://staff.db?mode=rwc";
const DEFAULT_PORT: u16 = 5080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REPORT_CONFIG_PATH: &str = "report.toml";

/// Process-wide settings read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub report_config_path: String,
}

impl AppConfig {
    /// Reads `DATABASE_URL`, `SERVER_PORT`, `DATABASE_MAX_CONNECTIONS` and
    /// `REPORT_CONFIG_PATH`, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let port = parse_or("SERVER_PORT", lookup("SERVER_PORT"), DEFAULT_PORT)?;
        let max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            lookup("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let report_config_path = lookup("REPORT_CONFIG_PATH")
            .unwrap_or_else(|| DEFAULT_REPORT_CONFIG_PATH.to_string());

        Ok(Self {
            database_url,
            port,
            max_connections,
            report_config_path,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value,
        }),
    }
}

/// Layout settings shared by both report renderers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Worksheet name in the spreadsheet export
    pub sheet_name: String,
    /// Heading printed above the table in the PDF export
    pub title: String,
    /// Body font size in points for the PDF export
    pub font_size: f32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            sheet_name: "Staff Report".to_string(),
            title: "Staff Report".to_string(),
            font_size: 9.0,
        }
    }
}

impl ReportSettings {
    /// Loads settings from a TOML file, or returns defaults when the file is absent.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            tracing::info!("Report config not found at {path}, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        settings.check()?;
        tracing::info!(?settings, "Loaded report config from {path}");
        Ok(settings)
    }

    fn check(&self) -> Result<(), ConfigError> {
        // Excel rejects empty sheet names and anything over 31 characters.
        let sheet_len = self.sheet_name.chars().count();
        if sheet_len == 0 || sheet_len > 31 {
            return Err(ConfigError::Invalid {
                key: "sheet_name",
                value: self.sheet_name.clone(),
            });
        }
        if !(4.0..=24.0).contains(&self.font_size) {
            return Err(ConfigError::Invalid {
                key: "font_size",
                value: self.font_size.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
