//! Menu loop and the apply-and-confirm flow.
//!
//! The main thread owns all terminal output. The countdown runs on its own
//! thread and reports ticks over a channel, so the confirmation prompt can
//! poll for keys without ever waiting past the end of the countdown.

mod logging;

pub use logging::{crash_log_path, init_logging, log_debug, log_file_path, log_panic};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Sender};
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{size as terminal_size, Clear, ClearType},
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::confirm::{ConfirmOutcome, ConfirmationFlag, ConfirmationTimer, Countdown, TimerEvent};
use crate::display::{apply_resolution, DisplayBackend, DisplayMode};
use crate::input::{Key, KeySource, MenuCommand};
use crate::menu::{format_banner, format_menu, MenuEntry, MenuOption, MenuState, MENU_OPTIONS};
use crate::theme::Palette;

/// Upper bound on how long the prompt waits for a key before checking the countdown.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit(ExitReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The Exit entry was selected.
    Selected,
    /// Ctrl+C at the menu.
    Interrupted,
}

impl ExitReason {
    pub fn exit_code(self) -> i32 {
        match self {
            ExitReason::Selected => 0,
            ExitReason::Interrupted => 130,
        }
    }
}

/// What happened to the backed-up mode when a countdown expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreStatus {
    Restored(DisplayMode),
    Failed(String),
    NoBackup,
}

/// Tunables for one menu session.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub countdown: Countdown,
    pub palette: Palette,
    /// Fixed width for rendering; 0 queries the terminal on every redraw.
    pub terminal_width: u16,
}

pub struct MenuApp<K, W> {
    keys: K,
    out: W,
    backend: Arc<dyn DisplayBackend>,
    settings: AppSettings,
    options: &'static [MenuOption],
    menu: MenuState,
}

impl<K: KeySource, W: Write> MenuApp<K, W> {
    pub fn new(keys: K, out: W, backend: Arc<dyn DisplayBackend>, settings: AppSettings) -> Self {
        Self {
            keys,
            out,
            backend,
            settings,
            options: MENU_OPTIONS,
            menu: MenuState::new(MENU_OPTIONS.len()),
        }
    }

    pub fn selected(&self) -> usize {
        self.menu.selected
    }

    /// Redraw, read a key, react; until the Exit entry is chosen.
    pub fn run(&mut self) -> Result<ExitReason> {
        log_debug(&format!("menu started with {} backend", self.backend.name()));
        loop {
            self.draw_menu()?;
            let key = self.keys.read_key().context("failed to read key")?;
            if let LoopControl::Exit(reason) = self.handle_key(key)? {
                self.clear_screen()?;
                if reason == ExitReason::Selected {
                    writeln!(self.out, "Goodbye!")?;
                }
                self.out.flush()?;
                log_debug(&format!("menu exiting: {reason:?}"));
                return Ok(reason);
            }
        }
    }

    /// Apply one keypress to the menu. Selecting a resolution runs the whole
    /// confirm flow before returning.
    pub fn handle_key(&mut self, key: Key) -> Result<LoopControl> {
        if key == Key::Interrupt {
            return Ok(LoopControl::Exit(ExitReason::Interrupted));
        }
        let Some(command) = MenuCommand::from_key(key) else {
            return Ok(LoopControl::Continue);
        };
        match command {
            MenuCommand::Up => self.menu.move_up(),
            MenuCommand::Down => self.menu.move_down(),
            MenuCommand::Select => {
                let entry = self
                    .options
                    .get(self.menu.selected)
                    .map(|option| option.entry)
                    .unwrap_or(MenuEntry::Exit);
                match entry {
                    MenuEntry::Exit => return Ok(LoopControl::Exit(ExitReason::Selected)),
                    MenuEntry::Resolution(mode) => {
                        self.apply_and_confirm(mode)?;
                        self.wait_to_continue()?;
                    }
                }
            }
        }
        Ok(LoopControl::Continue)
    }

    /// Switch to `target`, then keep it only if the user confirms before the
    /// countdown runs out.
    pub fn apply_and_confirm(&mut self, target: DisplayMode) -> Result<ConfirmOutcome> {
        let palette = self.settings.palette;
        let simulated = self.backend.is_simulated();
        self.clear_screen()?;
        let banner = format_banner(&palette, self.width());
        write!(self.out, "{banner}")?;

        let report = apply_resolution(self.backend.as_ref(), target);
        match &report.error {
            None if simulated => writeln!(
                self.out,
                "\nPretending to change resolution to {target} (demo mode)"
            )?,
            None => writeln!(self.out, "\nSwitched to {target}")?,
            Some(err) => {
                let message = format!("\nFailed to change resolution: {err:#}");
                writeln!(self.out, "{}", palette.paint(palette.error, &message))?;
            }
        }

        let flag = ConfirmationFlag::new();
        let (restore_tx, restore_rx) = bounded(1);
        let restore = restore_action(Arc::clone(&self.backend), report.previous, restore_tx.clone());
        let timer = match ConfirmationTimer::spawn(self.settings.countdown, flag.clone(), restore) {
            Ok(timer) => timer,
            Err(err) => {
                // No countdown means no way to confirm: put the old mode back now.
                restore_action(Arc::clone(&self.backend), report.previous, restore_tx)();
                return Err(err);
            }
        };

        let waited = self.wait_for_confirmation(&timer, &flag);
        self.keys.finish_polling();
        if let Err(err) = waited {
            log_debug(&format!("confirmation prompt failed: {err:#}"));
            let outcome = timer.expire_now();
            tracing::warn!(error = %err, ?outcome, "confirmation prompt aborted");
            return Err(err);
        }
        let outcome = timer.join()?;
        writeln!(self.out)?;
        match outcome {
            ConfirmOutcome::Confirmed => {
                let message = if simulated {
                    "Pretending to keep resolution!"
                } else {
                    "Resolution kept!"
                };
                writeln!(self.out, "{}", palette.paint(palette.success, message))?;
            }
            ConfirmOutcome::Expired => {
                let message = if simulated {
                    "Time expired. Restoring previous resolution (demo)..."
                } else {
                    "Time expired. Restoring previous resolution..."
                };
                writeln!(self.out, "{}", palette.paint(palette.error, message))?;
                self.report_restore(restore_rx.try_recv().ok())?;
            }
        }
        self.out.flush()?;
        Ok(outcome)
    }

    /// Prompt, then poll keys while rendering ticks until the countdown thread is done.
    fn wait_for_confirmation(
        &mut self,
        timer: &ConfirmationTimer,
        flag: &ConfirmationFlag,
    ) -> Result<()> {
        writeln!(self.out, "\nPress Y to keep this resolution: ")?;
        self.out.flush()?;
        let events = timer.events().clone();
        loop {
            let done = timer.is_finished();
            for event in events.try_iter() {
                self.render_timer_event(event)?;
            }
            if done {
                return Ok(());
            }
            if flag.is_confirmed() {
                if let Ok(event) = events.recv_timeout(KEY_POLL_INTERVAL) {
                    self.render_timer_event(event)?;
                }
                continue;
            }
            let key = self
                .keys
                .poll_key(KEY_POLL_INTERVAL)
                .context("failed to read confirmation key")?;
            if key.is_some_and(Key::is_affirmative) {
                log_debug("confirmation key received");
                flag.confirm();
            }
        }
    }

    fn render_timer_event(&mut self, event: TimerEvent) -> Result<()> {
        if let TimerEvent::Tick { remaining } = event {
            write!(
                self.out,
                "\rConfirm resolution in {remaining} seconds...   "
            )?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn report_restore(&mut self, status: Option<RestoreStatus>) -> Result<()> {
        let palette = self.settings.palette;
        match status {
            Some(RestoreStatus::Restored(mode)) => {
                writeln!(self.out, "Restored {mode}")?;
            }
            Some(RestoreStatus::Failed(err)) => {
                let message = format!("Failed to restore previous resolution: {err}");
                writeln!(self.out, "{}", palette.paint(palette.error, &message))?;
            }
            Some(RestoreStatus::NoBackup) | None => {
                let message = "Previous resolution unknown; nothing to restore";
                writeln!(self.out, "{}", palette.paint(palette.warning, message))?;
            }
        }
        Ok(())
    }

    fn wait_to_continue(&mut self) -> Result<()> {
        write!(self.out, "Press any key to continue...")?;
        self.out.flush()?;
        self.keys.read_key().context("failed to read key")?;
        Ok(())
    }

    fn draw_menu(&mut self) -> Result<()> {
        self.clear_screen()?;
        let screen = format_menu(
            self.options,
            self.menu.selected,
            &self.settings.palette,
            self.width(),
        );
        write!(self.out, "{screen}")?;
        self.out.flush()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn width(&self) -> u16 {
        resolved_cols(self.settings.terminal_width)
    }
}

pub(crate) fn resolved_cols(cached: u16) -> u16 {
    if cached == 0 {
        terminal_size().map(|(c, _)| c).unwrap_or(80)
    } else {
        cached
    }
}

/// Action run by the countdown thread on expiry: put the backed-up mode back.
fn restore_action(
    backend: Arc<dyn DisplayBackend>,
    previous: Option<DisplayMode>,
    status_tx: Sender<RestoreStatus>,
) -> impl FnOnce() + Send + 'static {
    move || {
        let status = match previous {
            Some(mode) => match backend.set_mode(mode) {
                Ok(()) => {
                    log_debug(&format!("restored {mode}"));
                    tracing::info!(backend = backend.name(), mode = %mode, "display mode restored");
                    RestoreStatus::Restored(mode)
                }
                Err(err) => {
                    log_debug(&format!("restore to {mode} failed: {err:#}"));
                    tracing::error!(backend = backend.name(), mode = %mode, error = %err, "restore failed");
                    RestoreStatus::Failed(format!("{err:#}"))
                }
            },
            None => {
                log_debug("no backed-up mode to restore");
                RestoreStatus::NoBackup
            }
        };
        let _ = status_tx.send(status);
    }
}
