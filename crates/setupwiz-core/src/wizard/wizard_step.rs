//! Step descriptor construction.
//!
//! Panels and control visibility are derived from the wizard state on every
//! call; nothing here is tracked separately.

use crate::model::{
    Controls, LaunchAction, Panel, SideEffect, Stage, StepDescriptor, Visibility,
};

use super::{FinishKind, Wizard};

impl<F, E> Wizard<F, E> {
    pub(super) fn describe(&self, side_effects: Vec<SideEffect>) -> StepDescriptor {
        StepDescriptor {
            stage: self.state.current_stage,
            panel: self.panel(),
            controls: self.controls(),
            next_label: self.next_label().to_string(),
            side_effects,
        }
    }

    fn panel(&self) -> Panel {
        let state = &self.state;
        let texts = &self.settings.texts;
        match state.current_stage {
            Stage::Start | Stage::Detecting => Panel::Blank,
            Stage::Intro => Panel::Intro {
                text: texts.intro.clone(),
                detecting: state.detection_pending,
            },
            Stage::UninstallIntro => Panel::Intro {
                text: texts.uninstall_intro.clone(),
                detecting: state.detection_pending,
            },
            Stage::ActionSelect => Panel::ActionSelect {
                selected: (state.requested_action != LaunchAction::Unknown)
                    .then_some(state.requested_action),
            },
            Stage::License => Panel::License {
                text: texts.license.clone(),
            },
            Stage::Dependencies => Panel::Dependencies {
                prerequisites: state.prerequisites.clone(),
            },
            Stage::Progress => Panel::Progress {
                action: state.requested_action,
                succeeded: state.execution.as_ref().map(|outcome| outcome.success),
            },
            Stage::Finish => match &state.finish {
                Some(FinishKind::ProcessRunning) => Panel::Finish {
                    text: texts.process_running.clone(),
                    launch_app: Visibility::Hidden,
                    show_help: Visibility::Hidden,
                },
                Some(FinishKind::Failed(message)) => Panel::Message {
                    text: message.clone(),
                },
                Some(FinishKind::Completed) | None => {
                    let options = if state.offers_launch_options() {
                        Visibility::Shown
                    } else {
                        Visibility::Hidden
                    };
                    Panel::Finish {
                        text: texts.completed.clone(),
                        launch_app: options,
                        show_help: options,
                    }
                }
            },
        }
    }

    fn controls(&self) -> Controls {
        let state = &self.state;
        let stage = state.current_stage;

        let previous = match stage {
            Stage::ActionSelect | Stage::License | Stage::Dependencies => Visibility::Shown,
            _ => Visibility::Hidden,
        };

        let next = if state.detection_pending || state.pending_confirmation.is_some() {
            Visibility::Hidden
        } else {
            match stage {
                Stage::Start | Stage::Detecting => Visibility::Hidden,
                Stage::ActionSelect if state.requested_action == LaunchAction::Unknown => {
                    Visibility::Disabled
                }
                Stage::Progress if state.execution.is_none() => Visibility::Hidden,
                _ => Visibility::Shown,
            }
        };

        let cancel = match stage {
            Stage::Finish => Visibility::Hidden,
            Stage::Progress if state.execution.is_some() => Visibility::Hidden,
            _ => Visibility::Shown,
        };

        Controls {
            previous,
            next,
            cancel,
        }
    }

    fn next_label(&self) -> &'static str {
        match (self.state.current_stage, &self.state.finish) {
            (Stage::Finish, Some(FinishKind::ProcessRunning)) => "Exit",
            (Stage::Finish, _) => "Finish",
            _ => "Next",
        }
    }
}
