//! Forward and backward transitions.
//!
//! Backward targets are computed from the original action, never from the
//! requested action, which may have been overridden by the uninstall prompt.

use tracing::{debug, info, warn};

use crate::collab::{ActionExecutor, FactProvider};
use crate::model::{LaunchAction, SideEffect, Stage, StepDescriptor};
use crate::util::log_snippet;

use super::{FinishKind, NavigationError, Wizard};

impl<F: FactProvider, E: ActionExecutor> Wizard<F, E> {
    /// Moves to the next stage and returns its descriptor.
    pub fn advance_forward(&mut self) -> Result<StepDescriptor, NavigationError> {
        let stage = self.state.current_stage;
        debug!(%stage, action = %self.state.requested_action, "advance forward");

        match stage {
            Stage::Start => Ok(self.forward_from_start()),
            Stage::UninstallIntro => Ok(self.start_execution()),
            Stage::Intro => {
                if self.state.original_action() == LaunchAction::Unknown {
                    Ok(self.enter(Stage::ActionSelect, Vec::new()))
                } else {
                    Ok(self.enter(Stage::License, Vec::new()))
                }
            }
            Stage::ActionSelect => {
                if self.state.requested_action == LaunchAction::Unknown {
                    return Err(self.reject(NavigationError::ActionRequired));
                }
                Ok(self.enter(Stage::License, Vec::new()))
            }
            Stage::License => {
                let prerequisites = self.facts.unresolved_prerequisites();
                if prerequisites.is_empty() {
                    Ok(self.start_execution())
                } else {
                    info!(count = prerequisites.len(), "unresolved prerequisites");
                    self.state.prerequisites = prerequisites;
                    Ok(self.enter(Stage::Dependencies, Vec::new()))
                }
            }
            Stage::Dependencies => Ok(self.start_execution()),
            Stage::Progress => self.forward_from_progress(),
            Stage::Finish => Ok(self.complete()),
            Stage::Detecting => Err(self.reject(NavigationError::UnhandledStage(stage))),
        }
    }

    /// Moves to the previous stage. Only action selection, license and
    /// dependencies have a predecessor.
    pub fn advance_backward(&mut self) -> Result<StepDescriptor, NavigationError> {
        let stage = self.state.current_stage;
        debug!(%stage, original = %self.state.original_action(), "advance backward");

        match stage {
            Stage::ActionSelect => {
                let intro = if self.state.original_action() == LaunchAction::Uninstall {
                    Stage::UninstallIntro
                } else {
                    Stage::Intro
                };
                Ok(self.enter_intro(intro, false))
            }
            Stage::License => match self.state.original_action() {
                LaunchAction::Install => Ok(self.enter_intro(Stage::Intro, false)),
                LaunchAction::Uninstall => Ok(self.enter_intro(Stage::UninstallIntro, false)),
                LaunchAction::Unknown => Ok(self.enter(Stage::ActionSelect, Vec::new())),
            },
            Stage::Dependencies => Ok(self.enter(Stage::License, Vec::new())),
            Stage::Detecting => Err(self.reject(NavigationError::UnhandledStage(stage))),
            Stage::Start
            | Stage::Intro
            | Stage::UninstallIntro
            | Stage::Progress
            | Stage::Finish => Err(self.reject(NavigationError::Unsupported(stage))),
        }
    }

    pub(super) fn forward_from_start(&mut self) -> StepDescriptor {
        let action = self.state.requested_action;
        if self.state.original_action.is_none() {
            self.state.original_action = Some(action);
        }

        match action {
            LaunchAction::Install => {
                if !self.state.process_checked {
                    self.state.process_checked = true;
                    self.state.process_was_running =
                        self.facts.is_process_running(&self.settings.process_name);
                }
                if self.state.process_was_running {
                    info!(
                        process = %self.settings.process_name,
                        "target process running; install blocked"
                    );
                    self.state.finish = Some(FinishKind::ProcessRunning);
                    self.enter(Stage::Finish, Vec::new())
                } else {
                    self.enter_intro(Stage::Intro, true)
                }
            }
            LaunchAction::Uninstall => self.enter_intro(Stage::UninstallIntro, true),
            LaunchAction::Unknown => self.enter_intro(Stage::Intro, true),
        }
    }

    fn enter_intro(&mut self, stage: Stage, detect: bool) -> StepDescriptor {
        let mut effects = Vec::new();
        if detect {
            self.state.detection_pending = true;
            effects.push(SideEffect::BeginDetection);
        }
        self.enter(stage, effects)
    }

    fn enter(&mut self, stage: Stage, effects: Vec<SideEffect>) -> StepDescriptor {
        debug!(from = %self.state.current_stage, to = %stage, "stage transition");
        self.state.current_stage = stage;
        self.describe(effects)
    }

    fn start_execution(&mut self) -> StepDescriptor {
        let action = self.state.requested_action;
        match self.executor.execute(action) {
            Ok(()) => {
                info!(%action, "execution accepted");
                let mut effects = Vec::new();
                if action == LaunchAction::Uninstall {
                    effects.push(SideEffect::TerminateProcesses(
                        self.settings.process_name.clone(),
                    ));
                }
                effects.push(SideEffect::ExecuteAction(action));
                self.state.execution = None;
                self.enter(Stage::Progress, effects)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(%action, error = %log_snippet(&message), "execution rejected");
                self.state.finish = Some(FinishKind::Failed(message));
                self.enter(Stage::Finish, Vec::new())
            }
        }
    }

    fn forward_from_progress(&mut self) -> Result<StepDescriptor, NavigationError> {
        let action = self.state.requested_action;
        let Some(outcome) = self.state.execution.clone() else {
            return Err(self.reject(NavigationError::ExecutionPending(action)));
        };

        let kind = if outcome.success {
            FinishKind::Completed
        } else {
            FinishKind::Failed(
                outcome
                    .message
                    .unwrap_or_else(|| format!("{} failed", action)),
            )
        };
        self.state.finish = Some(kind);
        Ok(self.enter(Stage::Finish, Vec::new()))
    }

    fn complete(&mut self) -> StepDescriptor {
        let mut effects = Vec::new();
        if self.state.offers_launch_options() {
            let options = self.state.finish_options;
            if options.launch_app {
                effects.push(SideEffect::LaunchInstalledApp);
            }
            if options.show_help {
                effects.push(SideEffect::OpenHelpUrl);
            }
        }
        effects.push(SideEffect::FinishWizard);
        info!(action = %self.state.requested_action, "wizard finished");
        self.describe(effects)
    }
}
