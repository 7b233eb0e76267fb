//! Setup wizard entrypoint with a ratatui-driven flow.

mod actions;
mod app;
mod checks;
mod detect;
mod engine;
mod events;
mod launch;
mod model;
mod paths;
mod runtime_config;
mod terminal;
mod ui;

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use setupwiz_core::{Config, FactProvider, LaunchAction, Wizard};
use tracing::{error, info};

use crate::actions::check_install_state;
use crate::app::{App, ExitReason};
use crate::checks::Checks;
use crate::detect::SystemFacts;
use crate::engine::Engine;
use crate::events::UiMessage;
use crate::launch::LaunchTargets;
use crate::paths::{format_with_home, InstallPaths};
use crate::terminal::TerminalGuard;

const DEFAULT_INTRO: &str = include_str!("../assets/intro.txt");
const DEFAULT_LICENSE: &str = include_str!("../assets/license.txt");

#[derive(Parser, Debug)]
#[command(name = "setupwiz", about = "Install or remove the product with a terminal wizard")]
pub(crate) struct Args {
    /// Action to perform; asks when omitted.
    #[arg(long, value_enum)]
    action: Option<ActionArg>,
    /// Path to config.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log file; defaults to the setupwiz state directory.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Validate configuration, print the probed facts, and exit.
    #[arg(long)]
    check: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ActionArg {
    Install,
    Uninstall,
}

impl From<ActionArg> for LaunchAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Install => LaunchAction::Install,
            ActionArg::Uninstall => LaunchAction::Uninstall,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_dir) = runtime_config::load_config(&args)?;
    let paths = InstallPaths::discover(&config, &config_dir)?;

    if args.check {
        return run_check(&config, &paths);
    }

    let log_path = runtime_config::init_tracing(&config, args.log_file.as_deref())?;
    let action = args.action.map(LaunchAction::from).unwrap_or_default();
    info!(%action, log = %log_path.display(), "setupwiz starting");

    let settings = config
        .wizard_settings(&config_dir, DEFAULT_INTRO, DEFAULT_LICENSE)
        .context("load wizard texts")?;
    let targets = LaunchTargets {
        product_key: config.product.key.clone(),
        help_url: config.product.help_url.clone(),
    };

    let (ui_tx, ui_rx) = mpsc::channel::<UiMessage>();
    let wizard = Wizard::new(
        settings,
        SystemFacts::new(config.prerequisites.clone()),
        Engine::new(paths, config.product.clone(), ui_tx.clone()),
    );

    let mut terminal_guard = TerminalGuard::new()?;
    let mut app = App::new(wizard, config.general.window_title.clone(), targets, action);
    let result = run_app(&mut terminal_guard, &mut app, ui_tx, ui_rx);
    terminal_guard.restore()?;

    match result {
        Ok(ExitReason::Finished) => {
            info!("setup finished");
            Ok(())
        }
        Ok(ExitReason::Cancelled) => {
            info!("setup cancelled");
            println!("Setup cancelled.");
            Ok(())
        }
        Err(err) => {
            error!(?err, "setup aborted");
            Err(err)
        }
    }
}

fn run_app(
    terminal_guard: &mut TerminalGuard,
    app: &mut App,
    ui_tx: mpsc::Sender<UiMessage>,
    ui_rx: mpsc::Receiver<UiMessage>,
) -> Result<ExitReason> {
    spawn_input_thread(ui_tx);
    terminal_guard.draw(app)?;

    loop {
        if let Some(reason) = app.exit {
            return Ok(reason);
        }
        match ui_rx.recv() {
            Ok(UiMessage::Input(input)) => handle_event(app, input),
            Ok(UiMessage::Engine(event)) => app.on_engine_event(event),
            Err(_) => return Ok(ExitReason::Cancelled),
        }
        terminal_guard.draw(app)?;
    }
}

fn handle_event(app: &mut App, event: Event) {
    let Event::Key(key) = event else {
        return;
    };
    if key.kind != KeyEventKind::Press {
        return;
    }
    if app.prompt.is_some() {
        handle_prompt_key(app, key);
    } else if app.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_notice();
        }
    } else {
        handle_wizard_key(app, key);
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::BackTab => app.move_prompt(-1),
        KeyCode::Right | KeyCode::Tab => app.move_prompt(1),
        KeyCode::Enter => app.answer_prompt(false),
        KeyCode::Esc => app.answer_prompt(true),
        _ => {}
    }
}

fn handle_wizard_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.cancel();
        return;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Right => app.next(),
        KeyCode::Backspace | KeyCode::Left => app.back(),
        KeyCode::Esc => app.cancel(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.scroll_by(-10),
        KeyCode::PageDown => app.scroll_by(10),
        KeyCode::Char(' ') => app.toggle(),
        _ => {}
    }
}

fn spawn_input_thread(ui_tx: mpsc::Sender<UiMessage>) {
    // Forward blocking terminal events to the UI thread; exit on channel close.
    thread::spawn(move || {
        while let Ok(event) = event::read() {
            if ui_tx.send(UiMessage::Input(event)).is_err() {
                break;
            }
        }
    });
}

fn run_check(config: &Config, paths: &InstallPaths) -> Result<()> {
    let product = &config.product;
    println!("{} ({})", product.name, product.key);
    println!("  payload:  {}", format_with_home(&paths.payload_dir));
    println!("  bin dir:  {}", format_with_home(&paths.bin_dir));
    println!("  record:   {}", format_with_home(&paths.record_path));

    let status = check_install_state(paths, product).status();
    println!("  state:    {}", status.label());

    let facts = SystemFacts::new(config.prerequisites.clone());
    let running = facts.is_process_running(&product.process_name);
    println!(
        "  process:  {} {}",
        product.process_name,
        if running { "running" } else { "not running" }
    );

    let checks = Checks::run(&config.prerequisites);
    println!("Tooling");
    for item in &checks.tooling {
        println!("  {} {} - {}", item.tag(), item.label, item.detail);
    }
    println!("Prerequisites ({} unresolved)", facts.prerequisite_count());
    for item in &checks.prerequisites {
        println!("  {} {} - {}", item.tag(), item.label, item.detail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_and_paths() {
        let args = Args::try_parse_from([
            "setupwiz",
            "--action",
            "uninstall",
            "--config",
            "/tmp/setupwiz.toml",
        ])
        .expect("parse");
        assert_eq!(
            args.action.map(LaunchAction::from),
            Some(LaunchAction::Uninstall)
        );
        assert_eq!(args.config, Some(PathBuf::from("/tmp/setupwiz.toml")));
        assert!(!args.check);
    }

    #[test]
    fn missing_action_means_unknown() {
        let args = Args::try_parse_from(["setupwiz", "--check"]).expect("parse");
        assert_eq!(
            args.action.map(LaunchAction::from).unwrap_or_default(),
            LaunchAction::Unknown
        );
        assert!(args.check);
        assert!(Args::try_parse_from(["setupwiz", "--action", "repair"]).is_err());
    }

    #[test]
    fn embedded_texts_are_present() {
        assert!(DEFAULT_INTRO.contains("Lan History Manager"));
        assert!(DEFAULT_LICENSE.contains("WITHOUT WARRANTY"));
    }
}
