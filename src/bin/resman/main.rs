//! ResMan entrypoint: pick a resolution from a menu, keep it or roll back.
//!
//! The menu loop runs on the main thread. Each resolution change spawns a
//! countdown thread that restores the previous mode unless the user confirms.

use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process;
use resman::{
    app::AppSettings,
    config::AppConfig,
    display::select_backend,
    doctor::doctor_report,
    init_logging,
    input::TerminalKeyReader,
    log_debug,
    telemetry::init_tracing,
    terminal_restore::TerminalRestoreGuard,
    theme::Palette,
    ExitReason, MenuApp,
};

fn main() -> Result<()> {
    let mut config = AppConfig::parse();
    if config.doctor {
        println!("{}", doctor_report(&config).render());
        return Ok(());
    }
    config.validate()?;
    init_logging(&config);
    let trace = init_tracing(&config);
    log_debug(&format!("=== ResMan started (trace log: {trace}) ==="));

    if !io::stdin().is_terminal() {
        bail!("resman needs an interactive terminal on stdin");
    }

    let reason = run_menu(&config)?;
    log_debug(&format!("=== ResMan exiting ({reason:?}) ==="));
    if reason == ExitReason::Interrupted {
        process::exit(reason.exit_code());
    }
    Ok(())
}

fn run_menu(config: &AppConfig) -> Result<ExitReason> {
    // Dropped before any process::exit so the terminal is back in cooked mode.
    let _terminal_guard = TerminalRestoreGuard::new();
    let backend = select_backend(config);
    tracing::info!(backend = backend.name(), "display backend selected");
    let settings = AppSettings {
        countdown: config.countdown(),
        palette: Palette::resolve(config.no_color),
        terminal_width: 0,
    };
    // Unlocked: the panic hook writes to stdout from whichever thread panics.
    let mut app = MenuApp::new(TerminalKeyReader::stdin(), io::stdout(), backend, settings);
    app.run()
}
