//! Messages serialized onto the installer's single UI queue.

use crossterm::event::Event;

use crate::actions::BundleStatus;

pub enum UiMessage {
    Input(Event),
    Engine(EngineEvent),
}

/// Reports from the detection and execution worker threads.
pub enum EngineEvent {
    DetectionComplete(BundleStatus),
    PlanStarted(Vec<&'static str>),
    StepStarted(usize),
    StepCompleted(usize),
    StepFailed(usize, String),
    LogLine(String),
    ExecutionFinished {
        success: bool,
        message: Option<String>,
    },
}
