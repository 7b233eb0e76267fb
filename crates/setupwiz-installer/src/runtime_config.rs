//! Config loading and tracing setup for the installer binary.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use setupwiz_core::Config;
use tracing_subscriber::EnvFilter;

use super::Args;

/// Loads the config and returns it with the directory relative paths resolve against.
pub(super) fn load_config(args: &Args) -> Result<(Config, PathBuf)> {
    match args.config.as_ref() {
        Some(path) => {
            let config = Config::load_from_path(path).context("read config from path")?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((config, base))
        }
        None => {
            let config = Config::load_default().context("read default config")?;
            let base = Config::default_config_dir().context("resolve config directory")?;
            Ok((config, base))
        }
    }
}

/// Logs go to a file; the terminal belongs to the wizard.
pub(super) fn init_tracing(config: &Config, log_file: Option<&Path>) -> Result<PathBuf> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => Config::default_state_dir()
            .context("resolve state directory")?
            .join("setupwiz.log"),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            config
                .general
                .log_level
                .clone()
                .unwrap_or_else(|| "info".to_string()),
        )
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}
