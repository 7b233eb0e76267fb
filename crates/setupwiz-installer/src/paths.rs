//! Filesystem layout for the payload, the install target, and the
//! install-location record.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use setupwiz_core::Config;

const RECORD_FILE: &str = "install-locations.toml";

#[derive(Debug, Clone)]
pub struct InstallPaths {
    /// Directory holding the binaries shipped with the installer.
    pub payload_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub record_path: PathBuf,
}

impl InstallPaths {
    /// Resolves configured directories relative to `config_dir`.
    pub fn discover(config: &Config, config_dir: &Path) -> Result<Self> {
        let payload_dir = match config.product.payload_dir.as_deref() {
            Some(dir) => Config::resolve_path(config_dir, dir),
            None => installer_dir()?,
        };
        let bin_dir = match config.product.bin_dir.as_deref() {
            Some(dir) => Config::resolve_path(config_dir, dir),
            None => home_dir()?.join(".local").join("bin"),
        };
        let record_path = Config::default_data_dir()
            .context("resolve data directory")?
            .join(RECORD_FILE);

        Ok(Self {
            payload_dir,
            bin_dir,
            record_path,
        })
    }
}

pub fn home_dir() -> Result<PathBuf> {
    let home = env::var("HOME").map_err(|_| anyhow!("HOME is not set"))?;
    Ok(PathBuf::from(home))
}

pub fn format_with_home(path: &Path) -> String {
    if let Ok(home) = home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            let mut rendered = PathBuf::from("$HOME");
            rendered.push(stripped);
            return rendered.display().to_string();
        }
    }
    path.display().to_string()
}

fn installer_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("locate installer executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("installer executable has no parent directory"))
}
