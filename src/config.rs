// File: src/config.rs
use crate::model::SortKey;
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the event API, e.g. `https://admin.example.com/api/`.
    /// Empty means offline: every call fails and the screen shows the error.
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default)]
    pub allow_insecure_certs: bool,

    #[serde(default)]
    pub default_sort: SortKey,

    #[serde(default)]
    pub sidebar_collapsed: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_token: None,
            allow_insecure_certs: false,
            default_sort: SortKey::default(),
            sidebar_collapsed: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = AppPaths::get_config_file_path()?;
        if path.exists() {
            return Self::load_from(&path);
        }
        Err(anyhow::anyhow!("Config file not found"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = AppPaths::get_config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get_path_string() -> Result<String> {
        let path = AppPaths::get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}
