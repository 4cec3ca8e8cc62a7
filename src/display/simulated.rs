use anyhow::Result;
use std::sync::Mutex;

use super::{DisplayBackend, DisplayMode};
use crate::lock_or_recover;

/// In-memory backend used when no real display API is reachable.
#[derive(Debug)]
pub struct SimulatedBackend {
    current: Mutex<DisplayMode>,
}

impl SimulatedBackend {
    pub fn new(start: DisplayMode) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }
}

impl DisplayBackend for SimulatedBackend {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn current_mode(&self) -> Result<DisplayMode> {
        Ok(*lock_or_recover(&self.current, "simulated current_mode"))
    }

    fn set_mode(&self, mode: DisplayMode) -> Result<()> {
        *lock_or_recover(&self.current, "simulated set_mode") = mode;
        Ok(())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
