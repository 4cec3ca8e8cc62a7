//! Confirm-or-revert countdown for a display-mode change.
//!
//! After a new mode is applied, a background thread counts down while the
//! main thread waits for the user. Each attempt gets its own
//! [`ConfirmationFlag`]; the timer checks it once per tick and, if the
//! countdown runs out unconfirmed, runs the restore action exactly once.
//! Aborting the timer (or dropping its handle) ends the countdown early with
//! the same check, so an unconfirmed mode is never left in place.

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::log_debug;

pub const DEFAULT_COUNTDOWN_TICKS: u32 = 10;
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Per-attempt confirmation token shared between the prompt and the timer.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationFlag(Arc<AtomicBool>);

impl ConfirmationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_confirmed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Counting { remaining: u32 },
    Confirmed,
    Expired,
}

impl TimerState {
    /// Resolve a tick boundary. `Counting` is returned unchanged when another
    /// tick still has to elapse.
    pub fn check(self, confirmed: bool) -> Self {
        match self {
            TimerState::Counting { .. } if confirmed => TimerState::Confirmed,
            TimerState::Counting { remaining: 0 } => TimerState::Expired,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Emitted at the start of each tick with the seconds left to confirm.
    Tick { remaining: u32 },
    Finished(ConfirmOutcome),
}

/// Countdown length and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub ticks: u32,
    pub tick: Duration,
}

impl Countdown {
    pub fn from_seconds(seconds: u32) -> Self {
        Self {
            ticks: seconds,
            tick: TICK_INTERVAL,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::from_seconds(DEFAULT_COUNTDOWN_TICKS)
    }
}

/// Handle to the background countdown of one resolution-change attempt.
pub struct ConfirmationTimer {
    handle: thread::JoinHandle<ConfirmOutcome>,
    events: Receiver<TimerEvent>,
    abort: Sender<()>,
}

impl ConfirmationTimer {
    /// Start counting. `on_expire` runs on the timer thread if the flag is
    /// still unset when the countdown ends.
    pub fn spawn<F>(countdown: Countdown, flag: ConfirmationFlag, on_expire: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, events) = unbounded();
        let (abort, abort_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("resman-countdown".to_string())
            .spawn(move || run_countdown(countdown, &flag, &tx, &abort_rx, on_expire))
            .map_err(|err| anyhow!("failed to spawn countdown thread: {err}"))?;
        Ok(Self {
            handle,
            events,
            abort,
        })
    }

    pub fn events(&self) -> &Receiver<TimerEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Skip the remaining ticks: confirmed if the flag is already set,
    /// otherwise expired (running the restore action). Waits for the result.
    pub fn expire_now(self) -> Result<ConfirmOutcome> {
        let _ = self.abort.try_send(());
        self.join()
    }

    /// Wait for the timer to reach a terminal state.
    pub fn join(self) -> Result<ConfirmOutcome> {
        // The abort sender must outlive the join: dropping it ends the countdown.
        let Self { handle, abort, .. } = self;
        let outcome = handle
            .join()
            .map_err(|_| anyhow!("countdown thread panicked"));
        drop(abort);
        outcome
    }
}

fn run_countdown<F>(
    countdown: Countdown,
    flag: &ConfirmationFlag,
    tx: &Sender<TimerEvent>,
    abort: &Receiver<()>,
    on_expire: F,
) -> ConfirmOutcome
where
    F: FnOnce(),
{
    let mut state = TimerState::Counting {
        remaining: countdown.ticks,
    };
    loop {
        state = state.check(flag.is_confirmed());
        match state {
            TimerState::Counting { remaining } => {
                let _ = tx.send(TimerEvent::Tick { remaining });
                let remaining = match abort.recv_timeout(countdown.tick) {
                    Err(RecvTimeoutError::Timeout) => remaining - 1,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        log_debug("countdown: aborted");
                        0
                    }
                };
                state = TimerState::Counting { remaining };
            }
            TimerState::Confirmed => {
                log_debug("countdown: confirmed");
                tracing::info!("resolution confirmed");
                let _ = tx.send(TimerEvent::Finished(ConfirmOutcome::Confirmed));
                return ConfirmOutcome::Confirmed;
            }
            TimerState::Expired => {
                log_debug("countdown: expired, restoring previous mode");
                tracing::info!(ticks = countdown.ticks, "confirmation window expired");
                on_expire();
                let _ = tx.send(TimerEvent::Finished(ConfirmOutcome::Expired));
                return ConfirmOutcome::Expired;
            }
        }
    }
}
