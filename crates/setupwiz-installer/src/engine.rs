//! Install engine behind the wizard's action executor contract.
//!
//! Detection and plan execution run on worker threads; results come back to
//! the UI thread as `EngineEvent`s on the shared queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use setupwiz_core::{ActionExecutor, ExecuteError, LaunchAction, ProductConfig};
use tracing::{info, warn};

use crate::actions::{
    build_plan, check_install_state, run_step, step_label, ActionContext, BundleStatus,
    InstallState, StepKind,
};
use crate::events::{EngineEvent, UiMessage};
use crate::paths::InstallPaths;

pub struct Engine {
    paths: Arc<InstallPaths>,
    product: Arc<ProductConfig>,
    ui_tx: Sender<UiMessage>,
    cancel_flag: Arc<AtomicBool>,
    // Stop request queued by the wizard; consumed by the next run.
    stop_target: Option<String>,
    // Action validated by `execute`, with the state it was validated against.
    accepted: Option<(LaunchAction, InstallState)>,
    worker: Option<JoinHandle<()>>,
}

impl Engine {
    pub fn new(paths: InstallPaths, product: ProductConfig, ui_tx: Sender<UiMessage>) -> Self {
        Self {
            paths: Arc::new(paths),
            product: Arc::new(product),
            ui_tx,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            stop_target: None,
            accepted: None,
            worker: None,
        }
    }

    pub fn paths(&self) -> &InstallPaths {
        &self.paths
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Runs the plan for an action previously accepted by `execute`.
    pub fn start(&mut self, action: LaunchAction) -> Result<()> {
        let install_state = match self.accepted.take() {
            Some((accepted, state)) if accepted == action => state,
            _ => return Err(anyhow!("{} was not accepted by the engine", action)),
        };
        if self.is_running() {
            return Err(anyhow!("an action is already running"));
        }
        self.join_worker();

        let stop_target = self.stop_target.take();
        let plan = build_plan(action, stop_target.is_some());
        info!(%action, steps = plan.len(), "starting plan");
        let labels = plan.iter().map(|step| step_label(*step)).collect();
        let _ = self
            .ui_tx
            .send(UiMessage::Engine(EngineEvent::PlanStarted(labels)));

        self.cancel_flag.store(false, Ordering::SeqCst);
        let worker = PlanWorker {
            action,
            plan,
            stop_target,
            install_state,
            paths: Arc::clone(&self.paths),
            product: Arc::clone(&self.product),
            cancel_flag: Arc::clone(&self.cancel_flag),
            ui_tx: self.ui_tx.clone(),
        };
        self.worker = Some(thread::spawn(move || worker.run()));
        Ok(())
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("engine worker panicked");
            }
        }
    }
}

impl ActionExecutor for Engine {
    fn execute(&mut self, action: LaunchAction) -> Result<(), ExecuteError> {
        if self.is_running() {
            return Err(ExecuteError::Failed(
                "another action is still running".to_string(),
            ));
        }
        let state = check_install_state(&self.paths, &self.product);
        let status = state.status();
        match (action, status) {
            (LaunchAction::Unknown, _) => return Err(ExecuteError::Unsupported(action)),
            (LaunchAction::Install, BundleStatus::Present) => {
                return Err(ExecuteError::AlreadyInstalled)
            }
            (LaunchAction::Uninstall, BundleStatus::Absent) => {
                return Err(ExecuteError::NotInstalled)
            }
            _ => {}
        }
        info!(%action, status = status.label(), "action accepted");
        self.accepted = Some((action, state));
        Ok(())
    }

    fn begin_detection(&mut self) {
        let paths = Arc::clone(&self.paths);
        let product = Arc::clone(&self.product);
        let ui_tx = self.ui_tx.clone();
        thread::spawn(move || {
            let status = check_install_state(&paths, &product).status();
            info!(status = status.label(), "bundle detection finished");
            let _ = ui_tx.send(UiMessage::Engine(EngineEvent::DetectionComplete(status)));
        });
    }

    fn terminate_processes(&mut self, name: &str) {
        info!(process = name, "process stop queued");
        self.stop_target = Some(name.to_string());
    }

    // Never joins here; a stop step can block for several seconds. Drop joins.
    fn cancel(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        self.accepted = None;
        if self.is_running() {
            info!("cancel requested; the worker stops after its current step");
        }
    }

    fn finish(&mut self) {
        self.join_worker();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        self.join_worker();
    }
}

struct PlanWorker {
    action: LaunchAction,
    plan: Vec<StepKind>,
    stop_target: Option<String>,
    install_state: InstallState,
    paths: Arc<InstallPaths>,
    product: Arc<ProductConfig>,
    cancel_flag: Arc<AtomicBool>,
    ui_tx: Sender<UiMessage>,
}

impl PlanWorker {
    fn run(self) {
        let (success, message) = self.run_steps();
        if success {
            info!(action = %self.action, "plan completed");
        } else {
            warn!(action = %self.action, "plan failed");
        }
        self.send(EngineEvent::ExecutionFinished { success, message });
    }

    fn run_steps(&self) -> (bool, Option<String>) {
        let mut ctx = ActionContext {
            paths: &self.paths,
            product: &self.product,
            install_state: Some(self.install_state.clone()),
            stop_target: self.stop_target.clone(),
            log_tx: self.ui_tx.clone(),
        };

        for (index, step) in self.plan.iter().enumerate() {
            if self.cancel_flag.load(Ordering::SeqCst) {
                let message = format!("{} cancelled", self.action);
                self.send(EngineEvent::StepFailed(index, message.clone()));
                return (false, Some(message));
            }

            self.send(EngineEvent::StepStarted(index));
            match run_step(*step, &mut ctx) {
                Ok(()) => self.send(EngineEvent::StepCompleted(index)),
                Err(err) => {
                    let message = format!("{:#}", err);
                    self.send(EngineEvent::StepFailed(index, message.clone()));
                    return (false, Some(message));
                }
            }
        }
        (true, None)
    }

    fn send(&self, event: EngineEvent) {
        let _ = self.ui_tx.send(UiMessage::Engine(event));
    }
}
