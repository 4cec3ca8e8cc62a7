//! Display-mode backends so the menu can switch resolution without knowing the platform.
//!
//! A backend reports the active mode and applies new ones. The real backend
//! drives `xrandr`; the simulated one keeps state in memory for hosts where
//! changing the resolution is not possible (or not wanted).

mod simulated;
mod xrandr;

pub use simulated::SimulatedBackend;
pub use xrandr::XrandrBackend;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::log_debug;

/// Screen resolution as a width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
}

impl DisplayMode {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for DisplayMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let Some((w, h)) = trimmed.split_once(['x', 'X']) else {
            bail!("display mode must look like WIDTHxHEIGHT, got {trimmed:?}");
        };
        let width: u32 = w
            .trim()
            .parse()
            .with_context(|| format!("invalid width in {trimmed:?}"))?;
        let height: u32 = h
            .trim()
            .parse()
            .with_context(|| format!("invalid height in {trimmed:?}"))?;
        if width == 0 || height == 0 {
            bail!("display mode dimensions must be non-zero, got {trimmed:?}");
        }
        Ok(Self { width, height })
    }
}

/// Platform display subsystem. Implementations must be shareable with the
/// countdown thread, which restores the previous mode on expiry.
pub trait DisplayBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn current_mode(&self) -> Result<DisplayMode>;

    fn set_mode(&self, mode: DisplayMode) -> Result<()>;

    /// True when mode changes are only pretended.
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Result of one resolution-change request.
#[derive(Debug)]
pub struct ApplyReport {
    pub target: DisplayMode,
    /// Mode active before the change; `None` if it could not be queried.
    pub previous: Option<DisplayMode>,
    pub error: Option<anyhow::Error>,
}

/// Back up the active mode, then request `target`. Failures are reported in
/// the returned report rather than propagated.
pub fn apply_resolution(backend: &dyn DisplayBackend, target: DisplayMode) -> ApplyReport {
    let previous = match backend.current_mode() {
        Ok(mode) => Some(mode),
        Err(err) => {
            log_debug(&format!("{}: failed to query current mode: {err:#}", backend.name()));
            tracing::warn!(backend = backend.name(), error = %err, "current mode query failed");
            None
        }
    };
    let error = backend.set_mode(target).err();
    match &error {
        None => {
            log_debug(&format!("{}: switched to {target}", backend.name()));
            tracing::info!(
                backend = backend.name(),
                width = target.width,
                height = target.height,
                "display mode applied"
            );
        }
        Some(err) => {
            log_debug(&format!("{}: failed to switch to {target}: {err:#}", backend.name()));
            tracing::warn!(
                backend = backend.name(),
                mode = %target,
                error = %err,
                "display mode change failed"
            );
        }
    }
    ApplyReport {
        target,
        previous,
        error,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum BackendKind {
    /// xrandr when an X display is reachable, simulated otherwise
    #[default]
    Auto,
    Xrandr,
    /// Print what would happen without touching the display
    Demo,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackendKind::Auto => "auto",
            BackendKind::Xrandr => "xrandr",
            BackendKind::Demo => "demo",
        };
        write!(f, "{label}")
    }
}

/// Pick the backend named by the config, resolving `auto` against the host.
pub fn select_backend(config: &AppConfig) -> Arc<dyn DisplayBackend> {
    match config.display_backend {
        BackendKind::Xrandr => Arc::new(xrandr_from_config(config)),
        BackendKind::Demo => Arc::new(SimulatedBackend::new(config.demo_start_mode)),
        BackendKind::Auto => {
            let xrandr = xrandr_from_config(config);
            if env::var_os("DISPLAY").is_some() && xrandr.is_available() {
                log_debug("auto backend: using xrandr");
                Arc::new(xrandr)
            } else {
                log_debug("auto backend: no X display, using demo mode");
                Arc::new(SimulatedBackend::new(config.demo_start_mode))
            }
        }
    }
}

fn xrandr_from_config(config: &AppConfig) -> XrandrBackend {
    XrandrBackend::new(config.xrandr_cmd.clone(), config.output.clone())
}
