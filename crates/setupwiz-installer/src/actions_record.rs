//! Install-location record shared by install, uninstall, and app launch.
//!
//! One TOML table per product key, stored in the setupwiz data directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths::format_with_home;

use super::{log_line, ActionContext};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstallLocation {
    pub install_dir: PathBuf,
    /// Program started by the finish panel's launch option.
    pub executable: PathBuf,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
struct InstallLocations {
    entries: BTreeMap<String, InstallLocation>,
}

fn load_locations(path: &Path) -> Result<InstallLocations> {
    if !path.exists() {
        return Ok(InstallLocations::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read {}", format_with_home(path)))?;
    toml::from_str(&contents).with_context(|| format!("parse {}", format_with_home(path)))
}

fn save_locations(path: &Path, locations: &InstallLocations) -> Result<()> {
    if locations.entries.is_empty() {
        if path.exists() {
            fs::remove_file(path).context("remove empty install-location record")?;
        }
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create data directory")?;
    }
    let contents =
        toml::to_string_pretty(locations).context("serialize install-location record")?;
    fs::write(path, contents).with_context(|| format!("write {}", format_with_home(path)))
}

pub fn lookup_location(path: &Path, key: &str) -> Result<Option<InstallLocation>> {
    Ok(load_locations(path)?.entries.remove(key))
}

pub fn store_location(path: &Path, key: &str, location: InstallLocation) -> Result<()> {
    let mut locations = load_locations(path)?;
    locations.entries.insert(key.to_string(), location);
    save_locations(path, &locations)
}

/// Returns the removed entry, if any.
pub fn clear_location(path: &Path, key: &str) -> Result<Option<InstallLocation>> {
    let mut locations = load_locations(path)?;
    let removed = locations.entries.remove(key);
    if removed.is_some() {
        save_locations(path, &locations)?;
    }
    Ok(removed)
}

pub fn record_location(ctx: &mut ActionContext) -> Result<()> {
    let Some(first) = ctx.product.binaries.first() else {
        log_line(ctx, "No binaries configured; nothing to record.");
        return Ok(());
    };
    let location = InstallLocation {
        install_dir: ctx.paths.bin_dir.clone(),
        executable: ctx.paths.bin_dir.join(first),
    };
    store_location(&ctx.paths.record_path, &ctx.product.key, location)?;
    log_line(
        ctx,
        format!(
            "Recorded install location in {}",
            format_with_home(&ctx.paths.record_path)
        ),
    );
    Ok(())
}

pub fn remove_location(ctx: &mut ActionContext) -> Result<()> {
    match clear_location(&ctx.paths.record_path, &ctx.product.key)? {
        Some(_) => log_line(ctx, format!("Removed install location for {}", ctx.product.key)),
        None => log_line(ctx, "Install location was not recorded."),
    }
    Ok(())
}
