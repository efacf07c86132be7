use crate::core::messages::Locale;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.origin`
pub const API_URL_ENV: &str = "USER_ADMIN_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_reset_debounce_ms")]
    pub reset_debounce_ms: u64,
    /// Role name counted as "admins" in the page statistics
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// File backing the persistent ("remember me") store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            reset_debounce_ms: default_reset_debounce_ms(),
            admin_role: default_admin_role(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

// Default value functions
fn default_origin() -> String {
    "http://localhost:3001".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_page_size() -> u32 {
    10
}

fn default_reset_debounce_ms() -> u64 {
    100
}

fn default_admin_role() -> String {
    "Admin".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("session.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Load the file if it exists, otherwise start from defaults, then apply
    /// environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origin) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.origin = origin;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let origin = self.api.origin.trim();
        if origin.is_empty() {
            bail!("api.origin must not be empty");
        }

        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            bail!(
                "api.origin '{}' must start with http:// or https://",
                self.api.origin
            );
        }

        if self.api.timeout_ms == 0 {
            bail!("api.timeout_ms must be greater than 0");
        }

        if self.list.page_size == 0 {
            bail!("list.page_size must be greater than 0");
        }

        if self.list.admin_role.trim().is_empty() {
            bail!("list.admin_role must not be empty");
        }

        if self.session.store_path.as_os_str().is_empty() {
            bail!("session.store_path must not be empty");
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
