//! Installer state snapshots and install checks.
//!
//! Separates read-only state inspection from the execution steps.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use anyhow::Result;
use setupwiz_core::ProductConfig;
use tracing::warn;

use crate::events::{EngineEvent, UiMessage};
use crate::paths::{format_with_home, InstallPaths};

use super::actions_record::lookup_location;
use super::InstallLocation;

pub struct ActionContext<'a> {
    pub paths: &'a InstallPaths,
    pub product: &'a ProductConfig,
    pub install_state: Option<InstallState>,
    /// Process name to stop, queued by the wizard before an uninstall.
    pub stop_target: Option<String>,
    pub log_tx: Sender<UiMessage>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BundleStatus {
    /// Every binary and the install-location record are present.
    Present,
    Partial,
    Absent,
}

impl BundleStatus {
    pub fn is_installed(self) -> bool {
        !matches!(self, BundleStatus::Absent)
    }

    pub fn label(self) -> &'static str {
        match self {
            BundleStatus::Present => "installed",
            BundleStatus::Partial => "partially installed",
            BundleStatus::Absent => "not installed",
        }
    }
}

#[derive(Clone, Debug)]
struct BinaryState {
    name: String,
    path: PathBuf,
    exists: bool,
}

#[derive(Clone, Debug)]
pub struct InstallState {
    binaries: Vec<BinaryState>,
    record: Option<InstallLocation>,
}

impl InstallState {
    pub fn status(&self) -> BundleStatus {
        let present = self.binaries.iter().filter(|binary| binary.exists).count();
        if present == self.binaries.len() && self.record.is_some() {
            BundleStatus::Present
        } else if present == 0 && self.record.is_none() {
            BundleStatus::Absent
        } else {
            BundleStatus::Partial
        }
    }
}

pub fn check_install_state(paths: &InstallPaths, product: &ProductConfig) -> InstallState {
    let binaries = product
        .binaries
        .iter()
        .map(|name| {
            let path = paths.bin_dir.join(name);
            BinaryState {
                name: name.clone(),
                exists: path.is_file(),
                path,
            }
        })
        .collect();

    let record = match lookup_location(&paths.record_path, &product.key) {
        Ok(record) => record,
        Err(err) => {
            warn!(?err, "install-location record unreadable; treating as absent");
            None
        }
    };

    InstallState { binaries, record }
}

pub fn check_install_state_step(ctx: &mut ActionContext) -> Result<()> {
    let state = ctx
        .install_state
        .clone()
        .unwrap_or_else(|| check_install_state(ctx.paths, ctx.product));

    log_line(ctx, "Install state:");
    for binary in &state.binaries {
        let status = if binary.exists { "present" } else { "missing" };
        log_line(
            ctx,
            format!(
                "- {}: {} ({})",
                binary.name,
                status,
                format_with_home(&binary.path)
            ),
        );
    }
    match state.record.as_ref() {
        Some(record) => log_line(
            ctx,
            format!(
                "- install location: {}",
                format_with_home(&record.install_dir)
            ),
        ),
        None => log_line(ctx, "- install location: not recorded"),
    }

    if state.status() == BundleStatus::Partial {
        log_line(ctx, "Install will continue and replace the missing items.");
    }

    Ok(())
}

pub fn log_line(ctx: &mut ActionContext, line: impl Into<String>) {
    let _ = ctx
        .log_tx
        .send(UiMessage::Engine(EngineEvent::LogLine(line.into())));
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::actions::actions_record::store_location;

    fn paths(root: &std::path::Path) -> InstallPaths {
        InstallPaths {
            payload_dir: root.join("payload"),
            bin_dir: root.join("bin"),
            record_path: root.join("data").join("install-locations.toml"),
        }
    }

    #[test]
    fn status_tracks_binaries_and_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths(dir.path());
        let product = ProductConfig::default();

        assert_eq!(
            check_install_state(&paths, &product).status(),
            BundleStatus::Absent
        );

        fs::create_dir_all(&paths.bin_dir).expect("bin dir");
        fs::write(paths.bin_dir.join("LanHistory"), b"bin").expect("binary");
        let state = check_install_state(&paths, &product);
        assert_eq!(state.status(), BundleStatus::Partial);
        assert!(state.status().is_installed());

        store_location(
            &paths.record_path,
            &product.key,
            InstallLocation {
                install_dir: paths.bin_dir.clone(),
                executable: paths.bin_dir.join("LanHistory"),
            },
        )
        .expect("record");
        assert_eq!(
            check_install_state(&paths, &product).status(),
            BundleStatus::Present
        );
    }
}
