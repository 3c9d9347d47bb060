//! Config subcommand handlers.

use std::path::PathBuf;
use std::str::FromStr;

use vpnctl_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

// ── Helpers ─────────────────────────────────────────────────────────

/// The file `--config` points at, or the platform default.
pub(crate) fn resolve_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config::config_path)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, CliError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| CliError::Validation {
        field: key.into(),
        reason: format!("'{value}': {e}"),
    })
}

/// Apply one `key = value` edit to `cfg`.
fn apply_setting(cfg: &mut Config, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "core.connect_delay_ms" | "connect_delay_ms" => {
            cfg.core.connect_delay_ms = parse_value(key, value)?;
        }
        "core.seed_mock_data" | "seed_mock_data" => {
            cfg.core.seed_mock_data = parse_value(key, value)?;
        }
        "core.query_log_buffer" | "query_log_buffer" => {
            cfg.core.query_log_buffer = parse_value(key, value)?;
        }
        _ => return Err(CliError::UnknownKey { key: key.into() }),
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = resolve_path(global);

    match args.command {
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg =
                config::load_config(Some(&path)).map_err(|e| CliError::config(&path, e))?;
            let text = toml::to_string_pretty(&cfg)
                .map_err(|e| CliError::config(&path, e.into()))?;
            print!("{text}");
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let written = config::save_config(&Config::default(), Some(&path))
                .map_err(|e| CliError::config(&path, e))?;
            eprintln!("Wrote {}", written.display());
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg =
                config::load_config(Some(&path)).map_err(|e| CliError::config(&path, e))?;
            apply_setting(&mut cfg, &key, &value)?;
            cfg.to_core_config().map_err(|e| CliError::config(&path, e))?;
            config::save_config(&cfg, Some(&path)).map_err(|e| CliError::config(&path, e))?;
            tracing::info!(key = %key, value = %value, path = %path.display(), "config updated");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn apply_setting_parses_typed_values() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "core.connect_delay_ms", "150").unwrap();
        apply_setting(&mut cfg, "seed_mock_data", "false").unwrap();
        apply_setting(&mut cfg, "core.query_log_buffer", "4").unwrap();

        assert_eq!(cfg.core.connect_delay_ms, 150);
        assert!(!cfg.core.seed_mock_data);
        assert_eq!(cfg.core.query_log_buffer, 4);
    }

    #[test]
    fn apply_setting_rejects_bad_input() {
        let mut cfg = Config::default();
        let err = apply_setting(&mut cfg, "core.seed_mock_data", "maybe").unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));

        let err = apply_setting(&mut cfg, "core.colour", "blue").unwrap_err();
        assert!(matches!(err, CliError::UnknownKey { .. }));
        assert_eq!(cfg, Config::default());
    }
}
