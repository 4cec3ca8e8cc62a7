//! Structured `tracing` output for mode changes, countdowns and restores.

use crate::config::AppConfig;
use std::env;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;

const TRACE_LOG_ENV: &str = "RESMAN_TRACE_LOG";

static INSTALLED: OnceLock<TraceSink> = OnceLock::new();

/// Where this run's trace events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceSink {
    Disabled,
    File(PathBuf),
    /// The trace file could not be opened; events are dropped.
    Unavailable(PathBuf),
}

impl fmt::Display for TraceSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceSink::Disabled => write!(f, "disabled"),
            TraceSink::File(path) => write!(f, "{}", path.display()),
            TraceSink::Unavailable(path) => write!(f, "unavailable ({})", path.display()),
        }
    }
}

pub fn tracing_log_path() -> PathBuf {
    env::var_os(TRACE_LOG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("resman_trace.jsonl"))
}

fn open_trace_file(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the JSON subscriber once per process. Events carry the thread
/// name so countdown-thread restores are told apart from menu actions.
pub fn init_tracing(config: &AppConfig) -> TraceSink {
    if !config.logs_enabled() {
        return TraceSink::Disabled;
    }
    INSTALLED
        .get_or_init(|| {
            let path = tracing_log_path();
            let Some(file) = open_trace_file(&path) else {
                return TraceSink::Unavailable(path);
            };
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_max_level(Level::DEBUG)
                .with_timer(UtcTime::rfc_3339())
                .with_thread_names(true)
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false)
                .finish();
            match tracing::subscriber::set_global_default(subscriber) {
                Ok(()) => TraceSink::File(path),
                Err(_) => TraceSink::Unavailable(path),
            }
        })
        .clone()
}
