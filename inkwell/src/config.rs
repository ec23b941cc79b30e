use anyhow::{Context, Result};
use config::{Config, ConfigError, File};
use inkwell_types::ColorScheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_API_URL;
use crate::session::SessionStore;

pub const API_URL_ENV: &str = "INKWELL_API_URL";

/// Runtime settings, layered from lowest to highest priority:
/// built-in defaults, `~/.inkwell/settings.toml`, `INKWELL_API_URL`, then
/// the `--api-url` flag.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_url: String,
    /// Keep the session cookie between runs
    pub persist_session: bool,
}

impl Settings {
    pub fn load(config_dir: Option<&Path>, cli_api_url: Option<String>) -> Result<Self, ConfigError> {
        let file = config_dir.map(|dir| dir.join("settings.toml"));
        Self::build(file, std::env::var(API_URL_ENV).ok(), cli_api_url)
    }

    fn build(
        file: Option<PathBuf>,
        env_api_url: Option<String>,
        cli_api_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("persist_session", true)?;

        if let Some(path) = file.filter(|p| p.exists()) {
            builder = builder.add_source(File::from(path).required(false));
        }
        if let Some(url) = env_api_url.filter(|u| !u.trim().is_empty()) {
            builder = builder.set_override("api_url", url)?;
        }
        if let Some(url) = cli_api_url {
            builder = builder.set_override("api_url", url)?;
        }

        builder.build()?.try_deserialize()
    }
}

/// Preferences stored as JSON in the config directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

/// Owns the `~/.inkwell` directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Self::at(home_dir.join(".inkwell"))
    }

    pub fn at(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .inkwell directory")?;
        }
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::at(self.config_dir.join("session"))
    }

    fn preferences_file(&self) -> PathBuf {
        self.config_dir.join("preferences.json")
    }

    pub fn save_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        let json = serde_json::to_string_pretty(prefs).context("Failed to serialize preferences")?;
        fs::write(self.preferences_file(), json).context("Failed to write preferences file")?;
        Ok(())
    }

    /// Saved preferences, or the defaults when none were saved yet
    pub fn load_preferences(&self) -> Result<UserPreferences> {
        let path = self.preferences_file();
        if !path.exists() {
            return Ok(UserPreferences::default());
        }
        let json = fs::read_to_string(&path).context("Failed to read preferences file")?;
        serde_json::from_str(&json).context("Failed to parse preferences")
    }
}
