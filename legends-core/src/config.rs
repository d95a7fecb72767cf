//! Global legends configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{LegendsError, LegendsResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/legends";

pub const DEFAULT_SERVER_PORT: u16 = 6080;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_seed_demo() -> bool {
    true
}

/// Configuration at ~/.config/legends/config.toml, overridable with
/// `LEGENDS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// User to edit as when no session has been saved yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Start new planners from the demo availability.
    #[serde(default = "default_seed_demo")]
    pub seed_demo: bool,
}

impl Default for LegendsConfig {
    fn default() -> Self {
        LegendsConfig {
            data_dir: default_data_dir(),
            default_user: None,
            server_port: DEFAULT_SERVER_PORT,
            seed_demo: true,
        }
    }
}

impl LegendsConfig {
    pub fn config_path() -> LegendsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LegendsError::Config("Could not determine config directory".into()))?
            .join("legends");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented template first
    /// if no config file exists.
    pub fn load() -> LegendsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> LegendsResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("LEGENDS"))
            .build()
            .map_err(|e| LegendsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| LegendsError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Write the current config to `path`.
    pub fn save(&self, path: &Path) -> LegendsResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| LegendsError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| LegendsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> LegendsResult<()> {
        let contents = format!(
            "\
# legends configuration

# Where planner state is stored:
# data_dir = \"{}\"

# User to edit as on first run:
# default_user = \"0\"

# Port for legends-server:
# server_port = {}

# Seed new planners with demo availability:
# seed_demo = true
",
            DEFAULT_DATA_DIR, DEFAULT_SERVER_PORT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LegendsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| LegendsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
