//! Terminal configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_SCROLLBACK_LINES;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Screen height in rows
    pub rows: usize,
    /// Screen width in columns
    pub cols: usize,
    /// Scrollback ring capacity in rows
    pub scrollback_lines: usize,
    /// Default foreground palette index, used when clearing cells
    pub default_fg: u8,
    /// Default background palette index
    pub default_bg: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 80,
            scrollback_lines: DEFAULT_SCROLLBACK_LINES,
            default_fg: 0x0A,
            default_bg: 0x00,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `~/.config/ozterm/config.json`, falling back to defaults
    pub fn load_or_default() -> Self {
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                if let Ok(config) = Self::load(&config_path) {
                    return config;
                }
            }
        }
        Self::default()
    }
}

fn dirs_config_path() -> Option<std::path::PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| std::path::PathBuf::from(home).join(".config").join("ozterm"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
