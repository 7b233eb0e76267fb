//! Wizard data model: stages, launch actions, step descriptors and side effects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level intent the wizard was launched with.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchAction {
    #[default]
    Unknown,
    Install,
    Uninstall,
}

impl LaunchAction {
    pub fn label(self) -> &'static str {
        match self {
            LaunchAction::Unknown => "Unknown",
            LaunchAction::Install => "Install",
            LaunchAction::Uninstall => "Uninstall",
        }
    }
}

impl fmt::Display for LaunchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named point in the wizard's transition graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    Detecting,
    ActionSelect,
    Intro,
    UninstallIntro,
    License,
    Dependencies,
    Progress,
    Finish,
}

impl Stage {
    /// Panel identifier shown in diagnostics and used by front ends.
    pub fn panel_id(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Detecting => "detecting",
            Stage::ActionSelect => "actions",
            Stage::Intro => "intro",
            Stage::UninstallIntro => "uninstall",
            Stage::License => "license",
            Stage::Dependencies => "dependencies",
            Stage::Progress => "progress",
            Stage::Finish => "finish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.panel_id())
    }
}

/// Visibility of a single navigation control.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
    Disabled,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        !matches!(self, Visibility::Hidden)
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Visibility::Shown)
    }
}

/// Visibility of the previous/next/cancel button row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Controls {
    pub previous: Visibility,
    pub next: Visibility,
    pub cancel: Visibility,
}

/// An external dependency the bundle needs before it can be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite {
    pub name: String,
    pub detail: String,
}

/// Stage-specific payload carried by a step descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Nothing to show; used for the transient start stage.
    Blank,
    Intro {
        text: String,
        // True while bundle detection is still outstanding.
        detecting: bool,
    },
    ActionSelect {
        selected: Option<LaunchAction>,
    },
    License {
        text: String,
    },
    Dependencies {
        prerequisites: Vec<Prerequisite>,
    },
    Progress {
        action: LaunchAction,
        // None while the engine is still running.
        succeeded: Option<bool>,
    },
    Finish {
        text: String,
        launch_app: Visibility,
        show_help: Visibility,
    },
    /// Scrolling message, used for execution failures.
    Message {
        text: String,
    },
}

impl Panel {
    pub fn display_text(&self) -> &str {
        match self {
            Panel::Intro { text, .. }
            | Panel::License { text }
            | Panel::Finish { text, .. }
            | Panel::Message { text } => text,
            Panel::Blank
            | Panel::ActionSelect { .. }
            | Panel::Dependencies { .. }
            | Panel::Progress { .. } => "",
        }
    }
}

/// Prompt the caller must resolve before the wizard can continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub message: String,
    pub options: Vec<String>,
}

impl ConfirmationRequest {
    /// Offered when detection finds the product already installed.
    pub fn uninstall_existing(product_name: &str) -> Self {
        Self {
            title: "Installation Status".to_string(),
            message: format!(
                "{} is already installed. Do you want to uninstall it?",
                product_name
            ),
            options: vec!["Uninstall".to_string(), "Cancel".to_string()],
        }
    }
}

/// The user's answer to a [`ConfirmationRequest`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfirmationChoice {
    Uninstall,
    Cancel,
}

impl ConfirmationChoice {
    /// Maps a selected option index; only the first option means uninstall.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            ConfirmationChoice::Uninstall
        } else {
            ConfirmationChoice::Cancel
        }
    }
}

/// Work requested from the caller outside the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    BeginDetection,
    ExecuteAction(LaunchAction),
    TerminateProcesses(String),
    LaunchInstalledApp,
    OpenHelpUrl,
    FinishWizard,
    CancelWizard,
    ShowConfirmationPrompt(ConfirmationRequest),
}

/// Checkbox state of the finish panel.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FinishOptions {
    pub launch_app: bool,
    pub show_help: bool,
}

/// Rendering and control instructions emitted for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    pub stage: Stage,
    pub panel: Panel,
    pub controls: Controls,
    pub next_label: String,
    pub side_effects: Vec<SideEffect>,
}

impl StepDescriptor {
    pub fn display_text(&self) -> &str {
        self.panel.display_text()
    }

    pub fn has_effect(&self, effect: &SideEffect) -> bool {
        self.side_effects.contains(effect)
    }
}
