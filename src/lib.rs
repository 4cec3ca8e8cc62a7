pub mod app;
pub mod config;
pub mod confirm;
pub mod display;
pub mod doctor;
pub mod input;
mod lock;
pub mod menu;
pub mod telemetry;
pub mod terminal_restore;
pub mod theme;

pub(crate) use lock::lock_or_recover;
pub use app::{crash_log_path, init_logging, log_debug, log_file_path, log_panic};
pub use app::{ExitReason, MenuApp};
