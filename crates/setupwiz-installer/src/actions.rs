//! Installer action orchestration and shared exports.

#[path = "actions_install.rs"]
mod actions_install;
#[path = "actions_plan.rs"]
mod actions_plan;
#[path = "actions_process.rs"]
mod actions_process;
#[path = "actions_record.rs"]
mod actions_record;
#[path = "actions_state.rs"]
mod actions_state;

pub use actions_plan::{build_plan, run_step, step_label, StepKind};
pub use actions_record::{lookup_location, InstallLocation};
pub use actions_state::{check_install_state, ActionContext, BundleStatus, InstallState};

pub(super) use actions_install::{install_binaries, remove_binaries, verify_payload};
pub(super) use actions_process::stop_processes;
pub(super) use actions_record::{record_location, remove_location};
pub(super) use actions_state::{check_install_state_step, log_line};
