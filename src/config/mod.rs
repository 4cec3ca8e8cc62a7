//! Command-line parsing and validation helpers.

#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;

use crate::confirm::{Countdown, DEFAULT_COUNTDOWN_TICKS};
use crate::display::{BackendKind, DisplayMode};

pub const DEFAULT_XRANDR_CMD: &str = "xrandr";
pub const DEFAULT_DEMO_START_MODE: &str = "1920x1080";
pub const MIN_CONFIRM_SECONDS: u32 = 1;
pub const MAX_CONFIRM_SECONDS: u32 = 60;

fn parse_display_mode(value: &str) -> Result<DisplayMode, String> {
    value.parse().map_err(|err| format!("{err:#}"))
}

/// CLI options for ResMan. With no flags the menu runs against the
/// auto-detected display backend with a ten second confirmation window.
#[derive(Debug, Parser, Clone)]
#[command(about = "ResMan - pick a display resolution, keep it or roll back", author, version)]
pub struct AppConfig {
    /// Display backend (auto, xrandr, demo)
    #[arg(
        long = "display-backend",
        env = "RESMAN_DISPLAY_BACKEND",
        value_enum,
        default_value_t = BackendKind::Auto
    )]
    pub display_backend: BackendKind,

    /// xrandr output to drive (defaults to the primary output)
    #[arg(long = "output", value_name = "NAME")]
    pub output: Option<String>,

    /// Path to the xrandr binary
    #[arg(long = "xrandr-cmd", default_value = DEFAULT_XRANDR_CMD)]
    pub xrandr_cmd: String,

    /// Starting resolution reported by the demo backend
    #[arg(
        long = "demo-start-mode",
        value_name = "WxH",
        default_value = DEFAULT_DEMO_START_MODE,
        value_parser = parse_display_mode
    )]
    pub demo_start_mode: DisplayMode,

    /// Seconds to confirm a new resolution before it is reverted
    #[arg(long = "confirm-seconds", default_value_t = DEFAULT_COUNTDOWN_TICKS)]
    pub confirm_seconds: u32,

    /// Disable colors (NO_COLOR is honored too)
    #[arg(long = "no-color", default_value_t = false)]
    pub no_color: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "RESMAN_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "RESMAN_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Print environment diagnostics and exit
    #[arg(long = "doctor", default_value_t = false)]
    pub doctor: bool,
}

impl AppConfig {
    pub fn logs_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::from_seconds(self.confirm_seconds)
    }
}
