//! Configuration management for evcharge.
//!
//! Loads configuration from ${EVCHARGE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for evcharge configuration and state directories.
    //!
    //! EVCHARGE_HOME resolution order:
    //! 1. EVCHARGE_HOME environment variable (if set)
    //! 2. ~/.config/evcharge (default)

    use std::path::PathBuf;

    /// Returns the evcharge home directory.
    ///
    /// Checks EVCHARGE_HOME env var first, falls back to ~/.config/evcharge
    pub fn evcharge_home() -> PathBuf {
        if let Ok(home) = std::env::var("EVCHARGE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("evcharge"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        evcharge_home().join("config.toml")
    }

    /// Returns the path to the session file.
    pub fn session_path() -> PathBuf {
        evcharge_home().join("session.json")
    }
}

/// API endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Optional API base URL (overridden by EVCHARGE_API_URL).
    pub base_url: Option<String>,
}

impl ApiConfig {
    /// Returns the configured base URL if set and non-empty.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API endpoint configuration.
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Default API base URL when neither env nor config provide one.
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

    /// Environment variable overriding the API base URL.
    pub const BASE_URL_ENV: &str = "EVCHARGE_API_URL";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the API base URL with precedence: env > config > default.
    ///
    /// # Errors
    /// Returns an error if the resolved value is not a valid http(s) URL.
    pub fn resolve_base_url(&self) -> Result<String> {
        if let Ok(env_url) = std::env::var(Self::BASE_URL_ENV) {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }

        if let Some(config_url) = self.api.effective_base_url() {
            validate_url(config_url)?;
            return Ok(config_url.trim_end_matches('/').to_string());
        }

        Ok(Self::DEFAULT_BASE_URL.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Creates or overwrites the config file with the default template.
    pub fn init_force(path: &Path) -> Result<()> {
        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

/// Validates that a URL is well-formed and uses an http(s) scheme.
fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Invalid API base URL (expected http or https): {url}");
    }
    Ok(())
}
