//! Host facts consulted by the wizard: running processes and prerequisites.

use std::process::Command;

use setupwiz_core::{FactProvider, Prerequisite, PrerequisiteConfig};
use tracing::debug;

use crate::checks::Checks;

/// Facts read from the live system.
pub struct SystemFacts {
    prerequisites: Vec<PrerequisiteConfig>,
}

impl SystemFacts {
    pub fn new(prerequisites: Vec<PrerequisiteConfig>) -> Self {
        Self { prerequisites }
    }
}

impl FactProvider for SystemFacts {
    fn is_process_running(&self, name: &str) -> bool {
        let pids = pgrep_exact(name);
        debug!(process = name, count = pids.len(), "process check");
        !pids.is_empty()
    }

    fn unresolved_prerequisites(&self) -> Vec<Prerequisite> {
        Checks::run(&self.prerequisites).unresolved()
    }
}

/// Pids of processes whose name matches exactly.
pub fn pgrep_exact(name: &str) -> Vec<u32> {
    let output = Command::new("pgrep").arg("-x").arg(name).output();
    let Ok(output) = output else {
        return Vec::new();
    };
    if !output.status.success() {
        return Vec::new();
    }
    parse_pids(&String::from_utf8_lossy(&output.stdout))
}

fn parse_pids(stdout: &str) -> Vec<u32> {
    stdout
        .lines()
        .filter_map(|line| line.trim().parse::<u32>().ok())
        .collect()
}
