//! Planning and dispatch for installer steps.
//!
//! Keeps the sequencing logic in one place so install and uninstall flows
//! stay predictable.

use anyhow::Result;
use setupwiz_core::LaunchAction;

use super::{
    check_install_state_step, install_binaries, record_location, remove_binaries,
    remove_location, stop_processes, verify_payload, ActionContext,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepKind {
    InstallCheck,
    StopProcesses,
    VerifyPayload,
    InstallBinaries,
    RecordLocation,
    RemoveBinaries,
    RemoveLocation,
}

/// Steps for one action. A requested stop always runs before any file is touched.
pub fn build_plan(action: LaunchAction, stop_processes: bool) -> Vec<StepKind> {
    match action {
        LaunchAction::Unknown => Vec::new(),
        LaunchAction::Install => {
            let mut steps = vec![StepKind::InstallCheck];
            if stop_processes {
                steps.push(StepKind::StopProcesses);
            }
            steps.extend([
                StepKind::VerifyPayload,
                StepKind::InstallBinaries,
                StepKind::RecordLocation,
            ]);
            steps
        }
        LaunchAction::Uninstall => {
            let mut steps = Vec::new();
            if stop_processes {
                steps.push(StepKind::StopProcesses);
            }
            steps.extend([StepKind::RemoveBinaries, StepKind::RemoveLocation]);
            steps
        }
    }
}

pub fn run_step(step: StepKind, ctx: &mut ActionContext) -> Result<()> {
    match step {
        StepKind::InstallCheck => check_install_state_step(ctx),
        StepKind::StopProcesses => stop_processes(ctx),
        StepKind::VerifyPayload => verify_payload(ctx),
        StepKind::InstallBinaries => install_binaries(ctx),
        StepKind::RecordLocation => record_location(ctx),
        StepKind::RemoveBinaries => remove_binaries(ctx),
        StepKind::RemoveLocation => remove_location(ctx),
    }
}

pub fn step_label(kind: StepKind) -> &'static str {
    match kind {
        StepKind::InstallCheck => "Check existing install",
        StepKind::StopProcesses => "Stop running processes",
        StepKind::VerifyPayload => "Verify payload",
        StepKind::InstallBinaries => "Install binaries",
        StepKind::RecordLocation => "Record install location",
        StepKind::RemoveBinaries => "Remove binaries",
        StepKind::RemoveLocation => "Remove install location",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninstall_stops_processes_first() {
        let plan = build_plan(LaunchAction::Uninstall, true);
        assert_eq!(
            plan,
            vec![
                StepKind::StopProcesses,
                StepKind::RemoveBinaries,
                StepKind::RemoveLocation
            ]
        );
        assert_eq!(plan.first(), Some(&StepKind::StopProcesses));
    }

    #[test]
    fn install_checks_state_before_copying() {
        let plan = build_plan(LaunchAction::Install, false);
        assert_eq!(plan[0], StepKind::InstallCheck);
        assert!(!plan.contains(&StepKind::StopProcesses));
        assert_eq!(plan.last(), Some(&StepKind::RecordLocation));
    }

    #[test]
    fn unknown_action_has_no_steps() {
        assert!(build_plan(LaunchAction::Unknown, true).is_empty());
    }

    #[test]
    fn labels_follow_plan_order() {
        let labels = build_plan(LaunchAction::Install, true)
            .into_iter()
            .map(step_label)
            .collect::<Vec<_>>();
        assert_eq!(labels[0], "Check existing install");
        assert_eq!(labels[1], "Stop running processes");
    }
}
