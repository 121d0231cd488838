//! Tracing subscriber setup for the binary.
//!
//! The overlay owns the terminal while it is open, so logs never go to
//! stdout or stderr. They are written to the configured `log_file`, else to
//! `kai-search.log` in the platform cache directory. Without either, log
//! output is discarded.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::overlay::config::OverlayConfig;

pub const LOG_ENV: &str = "KAI_SEARCH_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Where log output for `config` is written, if anywhere
pub fn log_path(config: &OverlayConfig) -> Option<PathBuf> {
    config
        .log_file
        .clone()
        .or_else(OverlayConfig::default_log_path)
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
pub fn init(config: &OverlayConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let Some(path) = log_path(config) else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init()
            .map_err(|err| anyhow!("failed to install log subscriber: {}", err))?;
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path {} has no file name", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {}", err))?;
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_log_file_wins() {
        let mut config = OverlayConfig::default();
        config.log_file = Some(PathBuf::from("/tmp/overlay.log"));
        assert_eq!(log_path(&config), Some(PathBuf::from("/tmp/overlay.log")));
    }

    #[test]
    fn test_default_log_file_used_when_unset() {
        let config = OverlayConfig::default();
        assert_eq!(log_path(&config), OverlayConfig::default_log_path());
    }
}
