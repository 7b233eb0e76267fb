//! Installer wizard controller, its collaborator contracts, and configuration.

pub mod collab;
pub mod config;
pub mod model;
pub mod texts;
pub mod util;
pub mod wizard;

pub use collab::*;
pub use config::*;
pub use model::*;
pub use texts::{WizardSettings, WizardTexts};
pub use util::program_in_path;
pub use wizard::{ExecutionOutcome, FinishKind, NavigationError, Wizard, WizardState};
