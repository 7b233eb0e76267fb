//! Installer wizard state machine.
//!
//! Every entry point is synchronous. Callers serialize user navigation and the
//! asynchronous engine notifications onto one thread before calling in; the
//! wizard itself never blocks and never locks.

mod wizard_nav;
mod wizard_step;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collab::{ActionExecutor, ConfirmationSurface, FactProvider};
use crate::model::{
    ConfirmationChoice, ConfirmationRequest, FinishOptions, LaunchAction, Prerequisite,
    SideEffect, Stage, StepDescriptor,
};
use crate::texts::WizardSettings;

/// Navigation requests the wizard refuses. The wizard state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("navigating back is not supported from the {0} stage")]
    Unsupported(Stage),
    #[error("An unhandled stage ({0}) was encountered.")]
    UnhandledStage(Stage),
    #[error("choose install or uninstall before continuing")]
    ActionRequired,
    #[error("the {0} action is still running")]
    ExecutionPending(LaunchAction),
    #[error("no confirmation is pending")]
    NoPendingConfirmation,
    #[error("{0} is not available on the {1} stage")]
    InvalidSelection(&'static str, Stage),
}

impl NavigationError {
    /// Title for the dialog that reports this error.
    pub fn title(&self) -> &'static str {
        match self {
            NavigationError::UnhandledStage(_) => "Unknown Stage",
            NavigationError::Unsupported(_) => "Navigation",
            _ => "Installer",
        }
    }
}

/// How the finish stage was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishKind {
    /// The target process was running when an install was requested.
    ProcessRunning,
    Completed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub message: Option<String>,
}

/// Mutable record owned by the wizard.
#[derive(Debug, Clone)]
pub struct WizardState {
    current_stage: Stage,
    requested_action: LaunchAction,
    // Set once, on the first transition out of Start.
    original_action: Option<LaunchAction>,
    process_was_running: bool,
    process_checked: bool,
    bundle_already_installed: Option<bool>,
    detection_pending: bool,
    pending_confirmation: Option<ConfirmationRequest>,
    action_overridden: bool,
    prerequisites: Vec<Prerequisite>,
    execution: Option<ExecutionOutcome>,
    finish: Option<FinishKind>,
    finish_options: FinishOptions,
}

impl WizardState {
    fn new(action: LaunchAction) -> Self {
        Self {
            current_stage: Stage::Start,
            requested_action: action,
            original_action: None,
            process_was_running: false,
            process_checked: false,
            bundle_already_installed: None,
            detection_pending: false,
            pending_confirmation: None,
            action_overridden: false,
            prerequisites: Vec::new(),
            execution: None,
            finish: None,
            finish_options: FinishOptions::default(),
        }
    }

    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    pub fn requested_action(&self) -> LaunchAction {
        self.requested_action
    }

    /// Action in effect when the wizard first left Start; falls back to the
    /// requested action before that point.
    pub fn original_action(&self) -> LaunchAction {
        self.original_action.unwrap_or(self.requested_action)
    }

    pub fn process_was_running(&self) -> bool {
        self.process_was_running
    }

    pub fn bundle_already_installed(&self) -> Option<bool> {
        self.bundle_already_installed
    }

    pub fn detection_pending(&self) -> bool {
        self.detection_pending
    }

    pub fn pending_confirmation(&self) -> Option<&ConfirmationRequest> {
        self.pending_confirmation.as_ref()
    }

    pub fn action_overridden(&self) -> bool {
        self.action_overridden
    }

    pub fn execution(&self) -> Option<&ExecutionOutcome> {
        self.execution.as_ref()
    }

    pub fn finish_kind(&self) -> Option<&FinishKind> {
        self.finish.as_ref()
    }

    pub fn finish_options(&self) -> FinishOptions {
        self.finish_options
    }

    /// Launch-app and show-help are offered only after a successful install.
    pub fn offers_launch_options(&self) -> bool {
        self.current_stage == Stage::Finish
            && matches!(self.finish, Some(FinishKind::Completed))
            && self.requested_action == LaunchAction::Install
            && !self.process_was_running
    }
}

/// The wizard controller. Facts and the executor are injected so the
/// transition table can run without a real installer engine.
pub struct Wizard<F, E> {
    settings: WizardSettings,
    state: WizardState,
    facts: F,
    executor: E,
}

impl<F: FactProvider, E: ActionExecutor> Wizard<F, E> {
    pub fn new(settings: WizardSettings, facts: F, executor: E) -> Self {
        Self {
            settings,
            state: WizardState::new(LaunchAction::Unknown),
            facts,
            executor,
        }
    }

    /// Resets to Start with the given action and advances out of it.
    pub fn initialize(&mut self, action: LaunchAction) -> StepDescriptor {
        info!(%action, product = %self.settings.product_name, "wizard initialized");
        self.state = WizardState::new(action);
        self.forward_from_start()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Descriptor for the current stage without any side effects.
    pub fn current(&self) -> StepDescriptor {
        self.describe(Vec::new())
    }

    /// Latches the detection result. Returns a confirmation request when the
    /// product is already installed and the user did not ask to uninstall.
    pub fn notify_detection_complete(
        &mut self,
        bundle_installed: bool,
    ) -> (StepDescriptor, Option<ConfirmationRequest>) {
        let installed = *self
            .state
            .bundle_already_installed
            .get_or_insert(bundle_installed);
        self.state.detection_pending = false;
        debug!(installed, stage = %self.state.current_stage, "detection complete");

        if installed && self.state.requested_action != LaunchAction::Uninstall {
            let request = ConfirmationRequest::uninstall_existing(&self.settings.product_name);
            self.state.pending_confirmation = Some(request.clone());
            let step = self.describe(vec![SideEffect::ShowConfirmationPrompt(request.clone())]);
            return (step, Some(request));
        }

        (self.current(), None)
    }

    /// Applies the user's answer to the already-installed prompt.
    pub fn resolve_confirmation(
        &mut self,
        choice: ConfirmationChoice,
    ) -> Result<StepDescriptor, NavigationError> {
        if self.state.pending_confirmation.take().is_none() {
            return Err(self.reject(NavigationError::NoPendingConfirmation));
        }

        match choice {
            ConfirmationChoice::Uninstall => {
                info!("existing installation found; switching to uninstall");
                self.state.requested_action = LaunchAction::Uninstall;
                self.state.action_overridden = true;
                self.state.current_stage = Stage::Start;
                Ok(self.forward_from_start())
            }
            ConfirmationChoice::Cancel => {
                info!("uninstall of existing installation declined");
                Ok(self.describe(vec![SideEffect::CancelWizard]))
            }
        }
    }

    /// Asks the surface and resolves the pending prompt. A surface that
    /// cannot show the prompt counts as a cancel.
    pub fn confirm_with<S: ConfirmationSurface>(
        &mut self,
        surface: &mut S,
    ) -> Result<StepDescriptor, NavigationError> {
        let Some(request) = self.state.pending_confirmation.clone() else {
            return Err(self.reject(NavigationError::NoPendingConfirmation));
        };
        let choice = match surface.ask(&request) {
            Ok(index) => ConfirmationChoice::from_index(index),
            Err(err) => {
                warn!(%err, "confirmation prompt failed; cancelling");
                ConfirmationChoice::Cancel
            }
        };
        self.resolve_confirmation(choice)
    }

    /// Records the engine result; the next forward step leaves Progress.
    pub fn notify_execution_complete(
        &mut self,
        success: bool,
        message: Option<String>,
    ) -> StepDescriptor {
        info!(
            success,
            action = %self.state.requested_action,
            detail = %crate::util::log_snippet(message.as_deref().unwrap_or_default()),
            "execution complete"
        );
        self.state.execution = Some(ExecutionOutcome { success, message });
        self.current()
    }

    /// Chooses install or uninstall on the action selection stage.
    pub fn select_action(&mut self, action: LaunchAction) -> Result<StepDescriptor, NavigationError> {
        if self.state.current_stage != Stage::ActionSelect {
            return Err(self.reject(NavigationError::InvalidSelection(
                "action selection",
                self.state.current_stage,
            )));
        }
        if action == LaunchAction::Unknown {
            return Err(self.reject(NavigationError::ActionRequired));
        }
        self.state.requested_action = action;
        Ok(self.current())
    }

    /// Updates the finish panel checkboxes.
    pub fn set_finish_options(
        &mut self,
        options: FinishOptions,
    ) -> Result<StepDescriptor, NavigationError> {
        if !self.state.offers_launch_options() {
            return Err(self.reject(NavigationError::InvalidSelection(
                "launch options",
                self.state.current_stage,
            )));
        }
        self.state.finish_options = options;
        Ok(self.current())
    }

    /// User pressed cancel; unwinding is left to the caller.
    pub fn cancel(&mut self) -> StepDescriptor {
        info!(stage = %self.state.current_stage, "cancel requested");
        self.describe(vec![SideEffect::CancelWizard])
    }

    fn reject(&self, err: NavigationError) -> NavigationError {
        warn!(stage = %self.state.current_stage, %err, "navigation rejected");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{ExecuteError, PromptError};
    use crate::model::{Panel, Visibility};
    use crate::texts::WizardTexts;

    struct FakeFacts {
        running: bool,
        prerequisites: Vec<Prerequisite>,
    }

    impl FactProvider for FakeFacts {
        fn is_process_running(&self, name: &str) -> bool {
            self.running && name == "LanHistory"
        }

        fn unresolved_prerequisites(&self) -> Vec<Prerequisite> {
            self.prerequisites.clone()
        }
    }

    #[derive(Default)]
    struct FakeExecutor {
        reject: Option<ExecuteError>,
        executed: Vec<LaunchAction>,
    }

    impl ActionExecutor for FakeExecutor {
        fn execute(&mut self, action: LaunchAction) -> Result<(), ExecuteError> {
            if let Some(err) = self.reject.clone() {
                return Err(err);
            }
            self.executed.push(action);
            Ok(())
        }

        fn begin_detection(&mut self) {}

        fn terminate_processes(&mut self, _name: &str) {}

        fn cancel(&mut self) {}

        fn finish(&mut self) {}
    }

    struct FailingSurface;

    impl ConfirmationSurface for FailingSurface {
        fn ask(&mut self, _request: &ConfirmationRequest) -> Result<usize, PromptError> {
            Err(PromptError::Unavailable("no display".to_string()))
        }
    }

    struct FixedSurface(usize);

    impl ConfirmationSurface for FixedSurface {
        fn ask(&mut self, _request: &ConfirmationRequest) -> Result<usize, PromptError> {
            Ok(self.0)
        }
    }

    fn settings() -> WizardSettings {
        WizardSettings {
            product_name: "Lan History Manager".to_string(),
            process_name: "LanHistory".to_string(),
            texts: WizardTexts::for_product(
                "Lan History Manager",
                "Welcome".to_string(),
                "License terms".to_string(),
            ),
        }
    }

    fn wizard(running: bool, missing: usize) -> Wizard<FakeFacts, FakeExecutor> {
        let prerequisites = (0..missing)
            .map(|index| Prerequisite {
                name: format!("dep-{index}"),
                detail: "required runtime".to_string(),
            })
            .collect();
        Wizard::new(
            settings(),
            FakeFacts {
                running,
                prerequisites,
            },
            FakeExecutor::default(),
        )
    }

    fn forward(wizard: &mut Wizard<FakeFacts, FakeExecutor>) -> StepDescriptor {
        match wizard.advance_forward() {
            Ok(step) => step,
            Err(err) => panic!("unexpected navigation error: {err}"),
        }
    }

    #[test]
    fn install_path_reaches_finish_without_revisiting_start() {
        let mut wizard = wizard(false, 0);
        let step = wizard.initialize(LaunchAction::Install);
        assert_eq!(step.stage, Stage::Intro);
        assert!(step.has_effect(&SideEffect::BeginDetection));
        assert_eq!(step.controls.next, Visibility::Hidden);

        let (step, prompt) = wizard.notify_detection_complete(false);
        assert!(prompt.is_none());
        assert_eq!(step.controls.next, Visibility::Shown);

        let mut visited = vec![Stage::Intro];
        let step = forward(&mut wizard);
        visited.push(step.stage);
        assert_eq!(step.stage, Stage::License);
        assert_eq!(step.display_text(), "License terms");

        let step = forward(&mut wizard);
        visited.push(step.stage);
        assert_eq!(step.stage, Stage::Progress);
        assert!(step.has_effect(&SideEffect::ExecuteAction(LaunchAction::Install)));
        assert_eq!(step.controls.next, Visibility::Hidden);

        let step = wizard.notify_execution_complete(true, None);
        assert_eq!(step.controls.next, Visibility::Shown);
        assert_eq!(step.controls.cancel, Visibility::Hidden);

        let step = forward(&mut wizard);
        visited.push(step.stage);
        assert_eq!(step.stage, Stage::Finish);
        assert_eq!(step.display_text(), "All done!");
        assert!(!visited.contains(&Stage::Start));
        assert_eq!(wizard.executor().executed, vec![LaunchAction::Install]);
    }

    #[test]
    fn uninstall_path_stops_processes_before_executing() {
        let mut wizard = wizard(true, 3);
        let step = wizard.initialize(LaunchAction::Uninstall);
        assert_eq!(step.stage, Stage::UninstallIntro);
        assert_eq!(step.display_text(), "Thanks for trying Lan History Manager");

        let (_, prompt) = wizard.notify_detection_complete(true);
        assert!(prompt.is_none());

        let step = forward(&mut wizard);
        assert_eq!(step.stage, Stage::Progress);
        assert_eq!(
            step.side_effects,
            vec![
                SideEffect::TerminateProcesses("LanHistory".to_string()),
                SideEffect::ExecuteAction(LaunchAction::Uninstall),
            ]
        );

        wizard.notify_execution_complete(true, None);
        let step = forward(&mut wizard);
        assert_eq!(step.stage, Stage::Finish);
        assert_eq!(
            step.panel,
            Panel::Finish {
                text: "All done!".to_string(),
                launch_app: Visibility::Hidden,
                show_help: Visibility::Hidden,
            }
        );
    }

    #[test]
    fn running_process_blocks_install() {
        let mut wizard = wizard(true, 0);
        let step = wizard.initialize(LaunchAction::Install);
        assert_eq!(step.stage, Stage::Finish);
        assert_eq!(step.next_label, "Exit");
        assert_eq!(step.controls.cancel, Visibility::Hidden);
        assert_eq!(step.controls.previous, Visibility::Hidden);
        assert!(wizard.state().process_was_running());

        let step = forward(&mut wizard);
        assert_eq!(step.side_effects, vec![SideEffect::FinishWizard]);
        assert!(wizard.executor().executed.is_empty());
    }

    #[test]
    fn installed_bundle_prompts_and_uninstall_restarts_from_start() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);

        let (step, prompt) = wizard.notify_detection_complete(true);
        let prompt = prompt.expect("prompt");
        assert_eq!(prompt.title, "Installation Status");
        assert!(step.has_effect(&SideEffect::ShowConfirmationPrompt(prompt)));
        assert_eq!(step.controls.next, Visibility::Hidden);

        let step = wizard
            .resolve_confirmation(ConfirmationChoice::Uninstall)
            .expect("resolve");
        assert_eq!(wizard.state().requested_action(), LaunchAction::Uninstall);
        assert_eq!(wizard.state().original_action(), LaunchAction::Install);
        assert!(wizard.state().action_overridden());
        assert_eq!(step.stage, Stage::UninstallIntro);
        assert!(step.has_effect(&SideEffect::BeginDetection));

        let (_, prompt) = wizard.notify_detection_complete(true);
        assert!(prompt.is_none());
    }

    #[test]
    fn declined_prompt_cancels_without_moving() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(true);

        let step = wizard
            .resolve_confirmation(ConfirmationChoice::Cancel)
            .expect("resolve");
        assert_eq!(step.stage, Stage::Intro);
        assert_eq!(step.side_effects, vec![SideEffect::CancelWizard]);
        assert_eq!(wizard.state().requested_action(), LaunchAction::Install);
        assert_eq!(
            wizard.resolve_confirmation(ConfirmationChoice::Cancel),
            Err(NavigationError::NoPendingConfirmation)
        );
    }

    #[test]
    fn failing_prompt_surface_counts_as_cancel() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(true);

        let step = wizard.confirm_with(&mut FailingSurface).expect("resolve");
        assert_eq!(step.side_effects, vec![SideEffect::CancelWizard]);
        assert_eq!(step.stage, Stage::Intro);
    }

    #[test]
    fn prompt_surface_choice_zero_uninstalls() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Unknown);
        wizard.notify_detection_complete(true);

        let step = wizard.confirm_with(&mut FixedSurface(0)).expect("resolve");
        assert_eq!(step.stage, Stage::UninstallIntro);
    }

    #[test]
    fn prerequisites_decide_whether_dependencies_are_shown() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        assert_eq!(forward(&mut wizard).stage, Stage::Progress);

        let mut wizard = self::wizard(false, 2);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        let step = forward(&mut wizard);
        assert_eq!(step.stage, Stage::Dependencies);
        match &step.panel {
            Panel::Dependencies { prerequisites } => assert_eq!(prerequisites.len(), 2),
            other => panic!("unexpected panel {other:?}"),
        }
        assert_eq!(step.controls.previous, Visibility::Shown);
        assert_eq!(forward(&mut wizard).stage, Stage::Progress);
    }

    #[test]
    fn backward_from_license_follows_original_action() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        let step = wizard.advance_backward().expect("back");
        assert_eq!(step.stage, Stage::Intro);
        assert_eq!(step.display_text(), "Welcome");
        assert!(!step.has_effect(&SideEffect::BeginDetection));
        assert_eq!(step.controls.next, Visibility::Shown);

        let mut wizard = self::wizard(false, 0);
        wizard.initialize(LaunchAction::Unknown);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        wizard.select_action(LaunchAction::Uninstall).expect("select");
        assert_eq!(forward(&mut wizard).stage, Stage::License);
        assert_eq!(
            wizard.advance_backward().expect("back").stage,
            Stage::ActionSelect
        );
        assert_eq!(
            wizard.advance_backward().expect("back").stage,
            Stage::Intro
        );
    }

    #[test]
    fn backward_from_license_after_uninstall_start_returns_to_uninstall_intro() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Uninstall);
        // License is not on the uninstall path; place the wizard there directly.
        wizard.state.original_action = Some(LaunchAction::Uninstall);
        wizard.state.requested_action = LaunchAction::Install;
        wizard.state.current_stage = Stage::License;
        wizard.state.detection_pending = false;

        let step = wizard.advance_backward().expect("back");
        assert_eq!(step.stage, Stage::UninstallIntro);
    }

    #[test]
    fn backward_is_rejected_on_progress_and_finish() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        forward(&mut wizard);
        assert_eq!(
            wizard.advance_backward(),
            Err(NavigationError::Unsupported(Stage::Progress))
        );
        assert_eq!(wizard.state().current_stage(), Stage::Progress);

        wizard.notify_execution_complete(true, None);
        forward(&mut wizard);
        assert_eq!(
            wizard.advance_backward(),
            Err(NavigationError::Unsupported(Stage::Finish))
        );
        assert_eq!(wizard.state().current_stage(), Stage::Finish);
    }

    #[test]
    fn backward_from_dependencies_returns_to_license() {
        let mut wizard = wizard(false, 2);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        assert_eq!(forward(&mut wizard).stage, Stage::Dependencies);

        let step = wizard.advance_backward().expect("back");
        assert_eq!(step.stage, Stage::License);
        assert_eq!(step.display_text(), "License terms");
        assert_eq!(step.controls.previous, Visibility::Shown);
        assert!(step.side_effects.is_empty());
        assert_eq!(wizard.state().current_stage(), Stage::License);
    }

    #[test]
    fn backward_is_rejected_on_start_and_intro_stages() {
        let mut wizard = wizard(false, 0);
        assert_eq!(
            wizard.advance_backward(),
            Err(NavigationError::Unsupported(Stage::Start))
        );
        assert_eq!(wizard.state().current_stage(), Stage::Start);

        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        assert_eq!(
            wizard.advance_backward(),
            Err(NavigationError::Unsupported(Stage::Intro))
        );
        assert_eq!(wizard.state().current_stage(), Stage::Intro);

        let mut wizard = self::wizard(false, 0);
        wizard.initialize(LaunchAction::Uninstall);
        wizard.notify_detection_complete(true);
        assert_eq!(
            wizard.advance_backward(),
            Err(NavigationError::Unsupported(Stage::UninstallIntro))
        );
        assert_eq!(wizard.state().current_stage(), Stage::UninstallIntro);
    }

    #[test]
    fn detection_result_is_latched_by_first_notification() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        assert!(wizard.state().detection_pending());
        assert_eq!(wizard.state().bundle_already_installed(), None);

        let (_, prompt) = wizard.notify_detection_complete(false);
        assert!(prompt.is_none());
        assert!(!wizard.state().detection_pending());
        assert_eq!(wizard.state().bundle_already_installed(), Some(false));

        let (step, prompt) = wizard.notify_detection_complete(true);
        assert!(prompt.is_none());
        assert!(wizard.state().pending_confirmation().is_none());
        assert_eq!(wizard.state().bundle_already_installed(), Some(false));
        assert_eq!(step.controls.next, Visibility::Shown);
    }

    #[test]
    fn execution_failure_shows_message_finish() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        forward(&mut wizard);
        assert_eq!(
            wizard.advance_forward(),
            Err(NavigationError::ExecutionPending(LaunchAction::Install))
        );

        wizard.notify_execution_complete(false, Some("disk full".to_string()));
        assert_eq!(
            wizard.state().execution(),
            Some(&ExecutionOutcome {
                success: false,
                message: Some("disk full".to_string()),
            })
        );
        let step = forward(&mut wizard);
        assert_eq!(
            wizard.state().finish_kind(),
            Some(&FinishKind::Failed("disk full".to_string()))
        );
        assert_eq!(step.stage, Stage::Finish);
        assert_eq!(
            step.panel,
            Panel::Message {
                text: "disk full".to_string()
            }
        );
        assert_eq!(step.controls.previous, Visibility::Hidden);
        assert_eq!(step.controls.cancel, Visibility::Hidden);
        assert_eq!(step.next_label, "Finish");
        assert_eq!(forward(&mut wizard).side_effects, vec![SideEffect::FinishWizard]);
    }

    #[test]
    fn rejected_execution_skips_progress() {
        let mut wizard = wizard(false, 0);
        wizard.executor_mut().reject = Some(ExecuteError::AlreadyInstalled);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        let step = forward(&mut wizard);
        assert_eq!(step.stage, Stage::Finish);
        assert_eq!(step.display_text(), "The software is already installed");
        assert!(step.side_effects.is_empty());
    }

    #[test]
    fn finish_options_are_offered_only_for_install() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.notify_detection_complete(false);
        forward(&mut wizard);
        forward(&mut wizard);
        wizard.notify_execution_complete(true, None);
        let step = forward(&mut wizard);
        assert_eq!(
            step.panel,
            Panel::Finish {
                text: "All done!".to_string(),
                launch_app: Visibility::Shown,
                show_help: Visibility::Shown,
            }
        );
        wizard
            .set_finish_options(FinishOptions {
                launch_app: true,
                show_help: true,
            })
            .expect("options");
        assert_eq!(
            forward(&mut wizard).side_effects,
            vec![
                SideEffect::LaunchInstalledApp,
                SideEffect::OpenHelpUrl,
                SideEffect::FinishWizard,
            ]
        );

        let mut wizard = self::wizard(false, 0);
        wizard.initialize(LaunchAction::Uninstall);
        wizard.notify_detection_complete(true);
        forward(&mut wizard);
        wizard.notify_execution_complete(true, None);
        forward(&mut wizard);
        assert!(wizard.set_finish_options(FinishOptions::default()).is_err());
        assert_eq!(forward(&mut wizard).side_effects, vec![SideEffect::FinishWizard]);
    }

    #[test]
    fn unknown_action_requires_a_selection() {
        let mut wizard = wizard(false, 0);
        let step = wizard.initialize(LaunchAction::Unknown);
        assert_eq!(step.stage, Stage::Intro);
        wizard.notify_detection_complete(false);

        let step = forward(&mut wizard);
        assert_eq!(step.stage, Stage::ActionSelect);
        assert_eq!(step.controls.next, Visibility::Disabled);
        assert_eq!(wizard.advance_forward(), Err(NavigationError::ActionRequired));
        assert_eq!(
            wizard.select_action(LaunchAction::Unknown),
            Err(NavigationError::ActionRequired)
        );

        let step = wizard.select_action(LaunchAction::Install).expect("select");
        assert_eq!(step.controls.next, Visibility::Shown);
        assert_eq!(forward(&mut wizard).stage, Stage::License);
    }

    #[test]
    fn unhandled_stage_is_reported_and_kept() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        wizard.state.current_stage = Stage::Detecting;

        let err = wizard.advance_forward().expect_err("unhandled");
        assert_eq!(err.to_string(), "An unhandled stage (detecting) was encountered.");
        assert_eq!(err.title(), "Unknown Stage");
        assert_eq!(wizard.state().current_stage(), Stage::Detecting);
        assert_eq!(
            wizard.advance_backward(),
            Err(NavigationError::UnhandledStage(Stage::Detecting))
        );
    }

    #[test]
    fn cancel_emits_cancel_request() {
        let mut wizard = wizard(false, 0);
        wizard.initialize(LaunchAction::Install);
        let step = wizard.cancel();
        assert_eq!(step.stage, Stage::Intro);
        assert_eq!(step.side_effects, vec![SideEffect::CancelWizard]);
    }
}
