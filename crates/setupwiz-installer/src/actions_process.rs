//! Stop running instances of the product before files are removed.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use crate::detect::pgrep_exact;

use super::{log_line, ActionContext};

const EXIT_TIMEOUT: Duration = Duration::from_secs(5);
const EXIT_POLL: Duration = Duration::from_millis(100);

pub fn stop_processes(ctx: &mut ActionContext) -> Result<()> {
    let Some(name) = ctx.stop_target.clone() else {
        log_line(ctx, "No process stop was requested.");
        return Ok(());
    };

    let pids = pgrep_exact(&name);
    if pids.is_empty() {
        log_line(ctx, format!("No running {} process found.", name));
        return Ok(());
    }

    for pid in pids {
        log_line(ctx, format!("Stopping {} (pid {})", name, pid));
        terminate(pid)?;
        wait_for_exit(ctx, pid)?;
    }
    Ok(())
}

fn terminate(pid: u32) -> Result<()> {
    let pid = i32::try_from(pid).map_err(|_| anyhow!("pid {pid} exceeds i32 range"))?;
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 || !pid_alive(pid) {
        Ok(())
    } else {
        Err(anyhow!(
            "failed to signal pid {}: {}",
            pid,
            std::io::Error::last_os_error()
        ))
    }
}

fn wait_for_exit(ctx: &mut ActionContext, pid: u32) -> Result<()> {
    let Ok(raw) = i32::try_from(pid) else {
        return Ok(());
    };
    let start = Instant::now();
    while start.elapsed() < EXIT_TIMEOUT {
        if !pid_alive(raw) {
            log_line(ctx, format!("Process {} stopped.", pid));
            return Ok(());
        }
        thread::sleep(EXIT_POLL);
    }

    Err(anyhow!(
        "process {} did not exit after {}s",
        pid,
        EXIT_TIMEOUT.as_secs()
    ))
}

fn pid_alive(pid: i32) -> bool {
    // Signal 0 only probes; EPERM still means the pid exists.
    let rc = unsafe { libc::kill(pid, 0) };
    rc == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(test)]
mod tests {
    use std::process::Command;
    use std::sync::mpsc;

    use setupwiz_core::ProductConfig;

    use super::*;
    use crate::paths::InstallPaths;

    #[test]
    fn missing_target_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = InstallPaths {
            payload_dir: dir.path().to_path_buf(),
            bin_dir: dir.path().to_path_buf(),
            record_path: dir.path().join("install-locations.toml"),
        };
        let product = ProductConfig::default();
        let (log_tx, _log_rx) = mpsc::channel();
        let mut ctx = ActionContext {
            paths: &paths,
            product: &product,
            install_state: None,
            stop_target: None,
            log_tx: log_tx.clone(),
        };
        stop_processes(&mut ctx).expect("no target");

        ctx.stop_target = Some("setupwiz-no-such-process".to_string());
        stop_processes(&mut ctx).expect("nothing running");
    }

    #[test]
    fn terminated_child_is_no_longer_alive() {
        let mut child = Command::new("sleep").arg("30").spawn().expect("spawn sleep");
        let pid = child.id();
        assert!(pid_alive(pid as i32));
        terminate(pid).expect("terminate");
        child.wait().expect("reap");
        assert!(!pid_alive(pid as i32));
    }
}
