use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::{
    io::{self, Write},
    panic,
    sync::{
        atomic::{AtomicBool, Ordering},
        OnceLock,
    },
};

static RAW_MODE_ENABLED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// RAII guard for the whole session: restores the terminal on drop (and on
/// panic via a shared hook).
pub struct TerminalRestoreGuard;

impl TerminalRestoreGuard {
    pub fn new() -> Self {
        install_terminal_panic_hook();
        TerminalRestoreGuard
    }
}

impl Default for TerminalRestoreGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Raw mode (no line buffering, no echo) for as long as the guard lives.
///
/// Nested guards are no-ops; only the outermost one switches the terminal
/// back to cooked mode.
pub struct RawModeGuard {
    owns: bool,
}

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        install_terminal_panic_hook();
        if RAW_MODE_ENABLED.swap(true, Ordering::SeqCst) {
            return Ok(Self { owns: false });
        }
        if let Err(err) = enable_raw_mode() {
            RAW_MODE_ENABLED.store(false, Ordering::SeqCst);
            return Err(err);
        }
        Ok(Self { owns: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.owns && RAW_MODE_ENABLED.swap(false, Ordering::SeqCst) {
            let _ = disable_raw_mode();
        }
    }
}

pub fn restore_terminal() {
    if RAW_MODE_ENABLED.swap(false, Ordering::SeqCst) {
        let _ = disable_raw_mode();
    }
    let mut stdout = io::stdout();
    let _ = execute!(stdout, Show);
    let _ = stdout.flush();
}

pub fn install_terminal_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            crate::log_panic(info);
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            crate::log_debug(&format!("panic at {location}"));
            previous(info);
        }));
    });
}
