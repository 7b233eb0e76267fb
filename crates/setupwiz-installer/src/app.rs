//! UI state for the wizard front end and the application of step descriptors.

use setupwiz_core::util::log_snippet;
use setupwiz_core::{
    ActionExecutor, ConfirmationRequest, ConfirmationSurface, FinishOptions, LaunchAction,
    NavigationError, Panel, PromptError, SideEffect, StepDescriptor, Wizard,
};
use tracing::{debug, info, warn};

use crate::detect::SystemFacts;
use crate::engine::Engine;
use crate::events::EngineEvent;
use crate::launch::{launch_installed_app, open_help_url, LaunchTargets};
use crate::model::{ActionStep, StepStatus};

const MAX_LOG_LINES: usize = 200;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitReason {
    Finished,
    Cancelled,
}

/// Modal shown for the already-installed question.
pub struct PromptState {
    pub request: ConfirmationRequest,
    pub selected: usize,
    // Esc closes the prompt without an answer.
    pub dismissed: bool,
}

impl ConfirmationSurface for PromptState {
    fn ask(&mut self, request: &ConfirmationRequest) -> Result<usize, PromptError> {
        if self.dismissed {
            return Err(PromptError::Unavailable("prompt dismissed".to_string()));
        }
        if request != &self.request {
            return Err(PromptError::Unavailable("prompt no longer current".to_string()));
        }
        Ok(self.selected)
    }
}

/// Diagnostic dialog for rejected navigation.
pub struct Notice {
    pub title: String,
    pub message: String,
}

pub struct App {
    pub wizard: Wizard<SystemFacts, Engine>,
    pub step: StepDescriptor,
    pub title: String,
    pub targets: LaunchTargets,
    pub prompt: Option<PromptState>,
    pub notice: Option<Notice>,
    /// Highlighted row on the action selection panel.
    pub action_index: usize,
    /// Highlighted checkbox on the finish panel.
    pub finish_index: usize,
    pub scroll: u16,
    pub steps: Vec<ActionStep>,
    pub logs: Vec<String>,
    pub exit: Option<ExitReason>,
}

impl App {
    pub fn new(
        mut wizard: Wizard<SystemFacts, Engine>,
        title: String,
        targets: LaunchTargets,
        action: LaunchAction,
    ) -> Self {
        let step = wizard.initialize(action);
        let mut app = Self {
            step: wizard.current(),
            wizard,
            title,
            targets,
            prompt: None,
            notice: None,
            action_index: 0,
            finish_index: 0,
            scroll: 0,
            steps: Vec::new(),
            logs: Vec::new(),
            exit: None,
        };
        app.apply_step(step);
        app
    }

    pub fn action_choices() -> [LaunchAction; 2] {
        [LaunchAction::Install, LaunchAction::Uninstall]
    }

    pub fn next(&mut self) {
        if !self.step.controls.next.is_enabled() {
            return;
        }
        let result = self.wizard.advance_forward();
        self.apply_result(result);
    }

    pub fn back(&mut self) {
        if !self.step.controls.previous.is_enabled() {
            return;
        }
        let result = self.wizard.advance_backward();
        self.apply_result(result);
    }

    pub fn cancel(&mut self) {
        if !self.step.controls.cancel.is_enabled() {
            return;
        }
        let step = self.wizard.cancel();
        self.apply_step(step);
    }

    pub fn move_selection(&mut self, delta: isize) {
        if matches!(self.step.panel, Panel::ActionSelect { .. }) {
            self.action_index = step_index(self.action_index, delta, 2);
            let action = Self::action_choices()[self.action_index];
            let result = self.wizard.select_action(action);
            self.apply_result(result);
        } else if self.offers_finish_options() {
            self.finish_index = step_index(self.finish_index, delta, 2);
        } else {
            self.scroll_by(delta);
        }
    }

    pub fn toggle(&mut self) {
        if matches!(self.step.panel, Panel::ActionSelect { .. }) {
            self.move_selection(0);
        } else if self.offers_finish_options() {
            let mut options = self.wizard.state().finish_options();
            if self.finish_index == 0 {
                options.launch_app = !options.launch_app;
            } else {
                options.show_help = !options.show_help;
            }
            let result = self.wizard.set_finish_options(options);
            self.apply_result(result);
        }
    }

    fn offers_finish_options(&self) -> bool {
        matches!(&self.step.panel, Panel::Finish { launch_app, .. } if launch_app.is_enabled())
    }

    pub fn finish_options(&self) -> FinishOptions {
        self.wizard.state().finish_options()
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let current = self.scroll as isize;
        self.scroll = (current + delta).clamp(0, u16::MAX as isize) as u16;
    }

    pub fn move_prompt(&mut self, delta: isize) {
        if let Some(prompt) = self.prompt.as_mut() {
            let len = prompt.request.options.len().max(1);
            prompt.selected = step_index(prompt.selected, delta, len);
        }
    }

    /// Resolves the open prompt; `dismiss` answers it as a cancel.
    pub fn answer_prompt(&mut self, dismiss: bool) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };
        prompt.dismissed = dismiss;
        let result = self.wizard.confirm_with(&mut prompt);
        self.apply_result(result);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn on_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::DetectionComplete(status) => {
                let (step, _) = self
                    .wizard
                    .notify_detection_complete(status.is_installed());
                self.apply_step(step);
            }
            EngineEvent::PlanStarted(labels) => {
                self.logs.clear();
                self.steps = labels
                    .into_iter()
                    .map(|name| ActionStep {
                        name,
                        status: StepStatus::Pending,
                    })
                    .collect();
            }
            EngineEvent::StepStarted(index) => self.set_step_status(index, StepStatus::Running),
            EngineEvent::StepCompleted(index) => self.set_step_status(index, StepStatus::Done),
            EngineEvent::StepFailed(index, err) => {
                self.set_step_status(index, StepStatus::Failed);
                self.append_log(format!("Error: {}", err));
            }
            EngineEvent::LogLine(line) => self.append_log(line),
            EngineEvent::ExecutionFinished { success, message } => {
                let step = self.wizard.notify_execution_complete(success, message);
                self.apply_step(step);
            }
        }
    }

    fn apply_result(&mut self, result: Result<StepDescriptor, NavigationError>) {
        match result {
            Ok(step) => self.apply_step(step),
            Err(err) => {
                self.notice = Some(Notice {
                    title: err.title().to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    /// Installs the descriptor for rendering, then runs its side effects in order.
    pub fn apply_step(&mut self, mut step: StepDescriptor) {
        let effects = std::mem::take(&mut step.side_effects);
        if step.stage != self.step.stage {
            self.scroll = 0;
        }
        if let Panel::ActionSelect {
            selected: Some(action),
        } = &step.panel
        {
            if let Some(index) = Self::action_choices().iter().position(|a| a == action) {
                self.action_index = index;
            }
        }
        self.step = step;
        for effect in effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: SideEffect) {
        debug!(?effect, "applying side effect");
        match effect {
            SideEffect::BeginDetection => self.wizard.executor_mut().begin_detection(),
            SideEffect::TerminateProcesses(name) => {
                self.wizard.executor_mut().terminate_processes(&name)
            }
            SideEffect::ExecuteAction(action) => {
                if let Err(err) = self.wizard.executor_mut().start(action) {
                    let message = format!("{:#}", err);
                    warn!(error = %log_snippet(&message), "failed to start action");
                    let step = self.wizard.notify_execution_complete(false, Some(message));
                    self.apply_step(step);
                }
            }
            SideEffect::LaunchInstalledApp => {
                let record = self.wizard.executor().paths().record_path.clone();
                if let Err(err) = launch_installed_app(&record, &self.targets.product_key) {
                    warn!(error = %log_snippet(&format!("{:#}", err)), "launch failed");
                }
            }
            SideEffect::OpenHelpUrl => {
                if let Err(err) = open_help_url(&self.targets.help_url) {
                    warn!(error = %log_snippet(&format!("{:#}", err)), "help page failed");
                }
            }
            SideEffect::FinishWizard => {
                self.wizard.executor_mut().finish();
                self.exit = Some(ExitReason::Finished);
            }
            SideEffect::CancelWizard => {
                info!("wizard cancelled");
                self.wizard.executor_mut().cancel();
                self.exit = Some(ExitReason::Cancelled);
            }
            SideEffect::ShowConfirmationPrompt(request) => {
                self.prompt = Some(PromptState {
                    request,
                    selected: 0,
                    dismissed: false,
                });
            }
        }
    }

    fn set_step_status(&mut self, index: usize, status: StepStatus) {
        if let Some(step) = self.steps.get_mut(index) {
            step.status = status;
        }
    }

    fn append_log(&mut self, line: String) {
        self.logs.push(line);
        if self.logs.len() > MAX_LOG_LINES {
            let excess = self.logs.len() - MAX_LOG_LINES;
            self.logs.drain(0..excess);
        }
    }
}

fn step_index(current: usize, delta: isize, len: usize) -> usize {
    let next = current as isize + delta;
    next.clamp(0, len.saturating_sub(1) as isize) as usize
}
