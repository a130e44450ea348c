//! Client configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};
use crate::model::DEFAULT_EVENT_COLOR;
use crate::slot::{DEFAULT_END_TIME, DEFAULT_TIME, TimeOfDay};

static DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:3001";

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

fn default_start_time() -> TimeOfDay {
    DEFAULT_TIME
}

fn default_end_time() -> TimeOfDay {
    DEFAULT_END_TIME
}

/// Configuration at ~/.config/agenda/config.toml
///
/// Every key can be overridden with an `AGENDA_`-prefixed environment
/// variable, e.g. `AGENDA_BACKEND_URL`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default = "default_color")]
    pub default_color: String,

    #[serde(default = "default_start_time")]
    pub default_start_time: TimeOfDay,

    #[serde(default = "default_end_time")]
    pub default_end_time: TimeOfDay,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            backend_url: default_backend_url(),
            default_color: default_color(),
            default_start_time: default_start_time(),
            default_end_time: default_end_time(),
        }
    }
}

impl AgendaConfig {
    pub fn config_dir() -> AgendaResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda"))
    }

    pub fn config_path() -> AgendaResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default location, creating a commented template on
    /// first run.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path, Environment::with_prefix("AGENDA"))
    }

    /// Load from `path` (optional) layered under `env`.
    pub fn load_from(path: &Path, env: Environment) -> AgendaResult<Self> {
        let config: AgendaConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Backend URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    /// The effective settings as TOML.
    pub fn to_toml(&self) -> AgendaResult<String> {
        toml::to_string_pretty(self).map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// Write the current settings to `path`, replacing the template.
    pub fn save_to(&self, path: &Path) -> AgendaResult<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Backend serving /api/events, /api/tasks, ...:
# backend_url = \"{}\"

# Colour for new events:
# default_color = \"{}\"

# Default times for new events:
# default_start_time = \"{}\"
# default_end_time = \"{}\"
",
            DEFAULT_BACKEND_URL, DEFAULT_EVENT_COLOR, DEFAULT_TIME, DEFAULT_END_TIME
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
