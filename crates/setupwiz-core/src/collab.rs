//! Narrow contracts for the collaborators the wizard consults.
//!
//! Implementations live in the front end; the wizard only sees these traits so
//! the transition table can be driven by in-memory fakes.

use thiserror::Error;

use crate::model::{ConfirmationRequest, LaunchAction, Prerequisite};

/// Read-only facts about the host system.
pub trait FactProvider {
    /// True when a process with exactly this name is running.
    fn is_process_running(&self, name: &str) -> bool;

    /// Prerequisites that are still missing.
    fn unresolved_prerequisites(&self) -> Vec<Prerequisite>;

    fn prerequisite_count(&self) -> usize {
        self.unresolved_prerequisites().len()
    }
}

/// Reasons the executor refuses to start an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("The software is already installed")]
    AlreadyInstalled,
    #[error("The software is not installed")]
    NotInstalled,
    #[error("{0} is not supported by this installer")]
    Unsupported(LaunchAction),
    #[error("{0}")]
    Failed(String),
}

/// Performs install and uninstall work on behalf of the wizard.
pub trait ActionExecutor {
    /// Validates and plans the action. Accepted actions are run by the caller
    /// when it applies the matching `ExecuteAction` side effect.
    fn execute(&mut self, action: LaunchAction) -> Result<(), ExecuteError>;

    /// Starts asynchronous bundle detection.
    fn begin_detection(&mut self);

    /// Stops every process with this exact name before the next run.
    fn terminate_processes(&mut self, name: &str);

    fn cancel(&mut self);

    fn finish(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("confirmation prompt unavailable: {0}")]
    Unavailable(String),
}

/// Presents a blocking choice to the user.
pub trait ConfirmationSurface {
    /// Returns the index of the selected option.
    fn ask(&mut self, request: &ConfirmationRequest) -> Result<usize, PromptError>;
}
