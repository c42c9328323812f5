//! Tracing setup.
//!
//! The console owns the terminal, so interactive sessions log to a daily file
//! under `$BOTDESK_HOME/logs`. One-shot commands log to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

pub const LOG_ENV: &str = "BOTDESK_LOG";
const LOG_FILE_PREFIX: &str = "botdesk.log";

/// Filter precedence: `BOTDESK_LOG`, then `log_filter` from config, then `info`.
///
/// Also returns the config directive when it was present but failed to parse.
pub fn env_filter(config: &Config) -> (EnvFilter, Option<String>) {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return (filter, None);
    }
    match config.log_filter.as_deref() {
        Some(directive) => match EnvFilter::try_new(directive) {
            Ok(filter) => (filter, None),
            Err(_) => (EnvFilter::new("info"), Some(directive.to_string())),
        },
        None => (EnvFilter::new("info"), None),
    }
}

fn warn_rejected(rejected: Option<&str>) {
    if let Some(directive) = rejected {
        tracing::warn!(directive, "invalid log_filter in config, falling back to info");
    }
}

/// Installs a file logger. Keep the guard alive until exit so buffered lines flush.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init_file(config: &Config) -> Result<WorkerGuard> {
    init_file_in(&paths::logs_dir(), config)
}

/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init_file_in(dir: &Path, config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let (filter, rejected) = env_filter(config);
    if let Some(directive) = &rejected {
        eprintln!("Ignoring invalid log_filter '{directive}' in config, using info");
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    warn_rejected(rejected.as_deref());
    Ok(guard)
}

/// Installs a stderr logger for non-interactive commands. Quiet unless asked.
pub fn init_stderr(config: &Config) {
    let (filter, rejected) = if std::env::var_os(LOG_ENV).is_some() || config.log_filter.is_some() {
        env_filter(config)
    } else {
        (EnvFilter::new("warn"), None)
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    warn_rejected(rejected.as_deref());
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_config_filter_used_when_valid() {
        let config = Config {
            log_filter: Some("botdesk_core=debug".to_string()),
            ..Config::default()
        };
        if std::env::var_os(LOG_ENV).is_none() {
            let (filter, rejected) = env_filter(&config);
            assert_eq!(filter.to_string(), "botdesk_core=debug");
            assert_eq!(rejected, None);
        }
    }

    #[test]
    fn test_invalid_config_filter_is_reported() {
        let config = Config {
            log_filter: Some("botdesk_core=loud".to_string()),
            ..Config::default()
        };
        if std::env::var_os(LOG_ENV).is_none() {
            let (filter, rejected) = env_filter(&config);
            assert_eq!(filter.to_string(), "info");
            assert_eq!(rejected.as_deref(), Some("botdesk_core=loud"));
        }
    }

    #[test]
    fn test_init_file_creates_directory() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs");
        let _guard = init_file_in(&logs, &Config::default()).unwrap();
        assert!(logs.is_dir());
    }
}
