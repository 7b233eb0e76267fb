//! Install and uninstall the product binaries.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::paths::format_with_home;

use super::{log_line, ActionContext};

pub fn verify_payload(ctx: &mut ActionContext) -> Result<()> {
    if ctx.product.binaries.is_empty() {
        return Err(anyhow!("no binaries configured for {}", ctx.product.name));
    }

    let missing = ctx
        .product
        .binaries
        .iter()
        .filter(|binary| !ctx.paths.payload_dir.join(binary.as_str()).is_file())
        .cloned()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(anyhow!(
            "missing payload in {}: {}",
            format_with_home(&ctx.paths.payload_dir),
            missing.join(", ")
        ));
    }

    log_line(
        ctx,
        format!(
            "Payload verified in {}",
            format_with_home(&ctx.paths.payload_dir)
        ),
    );
    Ok(())
}

pub fn install_binaries(ctx: &mut ActionContext) -> Result<()> {
    fs::create_dir_all(&ctx.paths.bin_dir).with_context(|| "failed to create bin directory")?;

    let binaries = ctx.product.binaries.clone();
    for binary in &binaries {
        let source = ctx.paths.payload_dir.join(binary);
        let destination = ctx.paths.bin_dir.join(binary);
        copy_binary(ctx, &source, &destination)?;
    }

    Ok(())
}

pub fn remove_binaries(ctx: &mut ActionContext) -> Result<()> {
    let binaries = ctx.product.binaries.clone();
    for binary in &binaries {
        let path = ctx.paths.bin_dir.join(binary);
        if path.exists() {
            fs::remove_file(&path).with_context(|| "failed to remove binary")?;
            log_line(ctx, format!("Removed binary {}", format_with_home(&path)));
        } else {
            log_line(
                ctx,
                format!("Binary not found at {}", format_with_home(&path)),
            );
        }
    }

    Ok(())
}

fn copy_binary(ctx: &mut ActionContext, source: &Path, destination: &Path) -> Result<()> {
    let source_display = format_with_home(source);
    let destination_display = format_with_home(destination);
    fs::copy(source, destination).map_err(|err| {
        anyhow!(
            "failed to install {} -> {}: {}",
            source_display,
            destination_display,
            err
        )
    })?;
    fs::set_permissions(destination, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to mark {} executable", destination_display))?;
    log_line(
        ctx,
        format!(
            "Installed {} -> {}",
            source.file_name().unwrap_or_default().to_string_lossy(),
            destination_display
        ),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use setupwiz_core::ProductConfig;

    use super::*;
    use crate::events::{EngineEvent, UiMessage};
    use crate::paths::InstallPaths;

    #[test]
    fn installs_and_removes_payload_binaries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = InstallPaths {
            payload_dir: dir.path().join("payload"),
            bin_dir: dir.path().join("bin"),
            record_path: dir.path().join("install-locations.toml"),
        };
        let product = ProductConfig::default();
        let (log_tx, log_rx) = mpsc::channel();
        let mut ctx = ActionContext {
            paths: &paths,
            product: &product,
            install_state: None,
            stop_target: None,
            log_tx,
        };

        assert!(verify_payload(&mut ctx).is_err());

        fs::create_dir_all(&paths.payload_dir).expect("payload dir");
        fs::write(paths.payload_dir.join("LanHistory"), b"#!/bin/sh\n").expect("payload");
        verify_payload(&mut ctx).expect("verify");
        install_binaries(&mut ctx).expect("install");

        let installed = paths.bin_dir.join("LanHistory");
        assert!(installed.is_file());
        let mode = fs::metadata(&installed).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);

        remove_binaries(&mut ctx).expect("remove");
        assert!(!installed.exists());
        remove_binaries(&mut ctx).expect("remove twice");

        drop(ctx);
        let lines = log_rx
            .try_iter()
            .filter_map(|message| match message {
                UiMessage::Engine(EngineEvent::LogLine(line)) => Some(line),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(lines.iter().any(|line| line.starts_with("Binary not found")));
    }
}
