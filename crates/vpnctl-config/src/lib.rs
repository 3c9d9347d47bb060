//! Configuration for vpnctl.
//!
//! TOML file plus `VPNCTL_` environment overrides, translated into
//! `vpnctl_core::CoreConfig`. The CLI resolves the file location and
//! hands the result to the controller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vpnctl_core::CoreConfig;
use vpnctl_core::config::{DEFAULT_CONNECT_DELAY, DEFAULT_QUERY_LOG_BUFFER};

/// Environment prefix; nested keys are separated by `__`
/// (`VPNCTL_CORE__CONNECT_DELAY_MS`).
pub const ENV_PREFIX: &str = "VPNCTL_";

const MAX_CONNECT_DELAY_MS: u64 = 5 * 60 * 1000;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub core: CoreSection,
}

/// `[core]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoreSection {
    /// Milliseconds spent CONNECTING before the connection is reported up.
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Start from the example servers and profiles.
    #[serde(default = "default_seed_mock_data")]
    pub seed_mock_data: bool,

    /// Query-log entries kept for a subscriber that has not attached yet.
    #[serde(default = "default_query_log_buffer")]
    pub query_log_buffer: usize,
}

impl Default for CoreSection {
    fn default() -> Self {
        Self {
            connect_delay_ms: default_connect_delay_ms(),
            seed_mock_data: default_seed_mock_data(),
            query_log_buffer: default_query_log_buffer(),
        }
    }
}

fn default_connect_delay_ms() -> u64 {
    u64::try_from(DEFAULT_CONNECT_DELAY.as_millis()).unwrap_or(2000)
}
fn default_seed_mock_data() -> bool {
    true
}
fn default_query_log_buffer() -> usize {
    DEFAULT_QUERY_LOG_BUFFER
}

impl Config {
    /// Validate and translate into the core's runtime configuration.
    pub fn to_core_config(&self) -> Result<CoreConfig, ConfigError> {
        let core = &self.core;
        if core.connect_delay_ms > MAX_CONNECT_DELAY_MS {
            return Err(ConfigError::Validation {
                field: "core.connect_delay_ms".into(),
                reason: format!(
                    "{} exceeds the maximum of {MAX_CONNECT_DELAY_MS}",
                    core.connect_delay_ms
                ),
            });
        }

        Ok(CoreConfig {
            connect_delay: Duration::from_millis(core.connect_delay_ms),
            seed_mock_data: core.seed_mock_data,
            query_log_buffer: core.query_log_buffer,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "vpnctl", "vpnctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vpnctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path` (or [`config_path`]), then
/// `VPNCTL_` environment variables. A missing file is not an error.
pub fn config_figment(path: Option<&Path>) -> Figment {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config: Config = config_figment(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the canonical
/// config path). Returns the path written.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}
