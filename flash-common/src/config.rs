//! Configuration loading and root folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The binaries handle tiers 1 and 2 through clap; this module provides the
//! TOML layer and the defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "FLASHCARDS_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "flashcards.db";

/// Contents of `config.toml`. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub study: StudyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive used when RUST_LOG is unset
    pub level: Option<String>,
}

impl LoggingConfig {
    /// Configured level, or the binary's own default when none is set
    pub fn level_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.level.as_deref().unwrap_or(fallback)
    }
}

/// Listening address of the flashcard API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Base URLs the study client talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Flashcard API
    pub backend_url: String,
    /// PDF generation and answer grading service
    pub agent_url: String,
    /// Upper bound for any single outbound request
    pub request_timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3001".to_string(),
            agent_url: "http://localhost:5050".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Timers of the study loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Delay before moving on after a fully correct answer
    pub auto_advance_ms: u64,
    /// Interval between list fetches while waiting for generated cards
    pub generation_poll_interval_ms: u64,
    /// Fetches attempted before giving up on new cards
    pub generation_poll_attempts: u32,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: 3000,
            generation_poll_interval_ms: 2000,
            generation_poll_attempts: 15,
        }
    }
}

/// Parse TOML text into a config
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// The config file that will be read: the explicit path if given, else the
/// default location when it exists.
pub fn config_source(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    }
}

/// Load the TOML config file.
///
/// An explicitly requested file must exist and parse. The default location
/// is optional: when it is missing the compiled defaults are used.
///
/// Nothing is logged here since the binaries read the config before the
/// tracing subscriber exists; they report [`config_source`] afterwards.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = config_source(explicit) else {
        return Ok(TomlConfig::default());
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content)
}

/// `<config_dir>/flashcards/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("flashcards").join("config.toml"))
}

/// Resolve the root folder holding the database
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("flashcards"))
        .unwrap_or_else(|| PathBuf::from("./flashcards_data"))
}

/// Database file inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}
