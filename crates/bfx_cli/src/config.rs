//! bfx configuration file handling

use anyhow::{Context, Result};
use bfx_player::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file picked up from the working directory
pub const CONFIG_FILE: &str = "bfx.toml";

/// Top-level configuration (bfx.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BfxConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl BfxConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("No config file found at {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load an explicit config file, else `bfx.toml` in the working
    /// directory if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.is_file() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: BfxConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Player settings with command-line overrides applied on top
    pub fn player_with_overrides(&self, fps: Option<f64>, speed: Option<f64>) -> PlayerConfig {
        let mut player = self.player.clone();
        if let Some(fps) = fps {
            player = player.with_fps(fps);
        }
        if let Some(speed) = speed {
            player = player.with_speed(speed);
        }
        player
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
