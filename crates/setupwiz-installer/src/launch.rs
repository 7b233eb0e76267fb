//! Post-install launches requested from the finish panel.

use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::actions::lookup_location;
use crate::paths::format_with_home;

/// Where the finish panel's launch options point.
#[derive(Debug, Clone)]
pub struct LaunchTargets {
    pub product_key: String,
    pub help_url: String,
}

/// Starts the recorded executable detached from the installer. A missing
/// record is logged and ignored.
pub fn launch_installed_app(record_path: &Path, product_key: &str) -> Result<()> {
    let Some(location) = lookup_location(record_path, product_key)? else {
        warn!(product = product_key, "no install location recorded; skipping launch");
        return Ok(());
    };
    info!(
        executable = %format_with_home(&location.executable),
        "launching installed app"
    );
    spawn_detached(
        Command::new(&location.executable).current_dir(&location.install_dir),
    )
    .with_context(|| format!("launch {}", format_with_home(&location.executable)))
}

pub fn open_help_url(url: &str) -> Result<()> {
    info!(url, "opening help page");
    spawn_detached(Command::new("xdg-open").arg(url)).context("run xdg-open")
}

fn spawn_detached(command: &mut Command) -> Result<()> {
    // New process group so the child survives the installer's terminal.
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()?;
    Ok(())
}
