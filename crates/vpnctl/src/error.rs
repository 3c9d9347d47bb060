//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use vpnctl_config::ConfigError;
use vpnctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration could not be loaded")]
    #[diagnostic(
        code(vpnctl::config),
        help(
            "Check the file at {path} and any VPNCTL_* environment variables.\n\
             Show the resolved values with: vpnctl config show"
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(vpnctl::config_exists),
        help("Use --force to overwrite it, or edit values with: vpnctl config set <key> <value>")
    )]
    ConfigExists { path: String },

    #[error("Unknown configuration key '{key}'")]
    #[diagnostic(
        code(vpnctl::unknown_key),
        help("Known keys: core.connect_delay_ms, core.seed_mock_data, core.query_log_buffer")
    )]
    UnknownKey { key: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vpnctl::validation))]
    Validation { field: String, reason: String },

    // ── Core ─────────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(vpnctl::core))]
    Core(#[from] CoreError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(vpnctl::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn config(path: &std::path::Path, source: ConfigError) -> Self {
        match source {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            source => Self::Config {
                path: path.display().to_string(),
                source,
            },
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::UnknownKey { .. } => exit_code::USAGE,
            Self::Config { .. } | Self::ConfigExists { .. } => exit_code::CONFIG,
            Self::Core(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_from_config_is_a_usage_error() {
        let err = CliError::config(
            std::path::Path::new("/tmp/x.toml"),
            ConfigError::Validation {
                field: "core.connect_delay_ms".into(),
                reason: "too large".into(),
            },
        );
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("core.connect_delay_ms"));
    }

    #[test]
    fn io_failures_are_general() {
        let err = CliError::from(std::io::Error::other("boom"));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert_ne!(err.exit_code(), exit_code::SUCCESS);
    }
}
