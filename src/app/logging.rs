//! Opt-in file logs. Nothing here ever writes to the terminal, which the
//! menu owns.

use crate::config::AppConfig;
use std::{
    env, fs,
    io::Write,
    panic,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

const DEBUG_LOG_LIMIT: u64 = 5 * 1024 * 1024;
const CRASH_LOG_LIMIT: u64 = 256 * 1024;

static ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: Mutex<Option<CappedLog>> = Mutex::new(None);

pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("resman.log")
}

/// Panic records only; kept apart so they survive debug-log rotation.
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("resman_crash.log")
}

/// Append-only file that starts over once it would grow past `limit`.
struct CappedLog {
    path: PathBuf,
    file: fs::File,
    limit: u64,
    len: u64,
}

impl CappedLog {
    fn open(path: PathBuf, limit: u64) -> Option<Self> {
        let len = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
        let mut log = Self {
            file: open_append(&path)?,
            path,
            limit,
            len,
        };
        if log.len > log.limit {
            log.start_over();
        }
        Some(log)
    }

    fn start_over(&mut self) {
        let truncated = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path);
        if let Ok(file) = truncated {
            self.file = file;
            self.len = 0;
        }
    }

    fn append(&mut self, line: &str) {
        let incoming = line.len() as u64;
        if self.len.saturating_add(incoming) > self.limit {
            self.start_over();
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.len = self.len.saturating_add(incoming);
        }
    }
}

fn open_append(path: &Path) -> Option<fs::File> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}

/// `[unix-seconds thread] message`, one record per line.
fn record(msg: &str) -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let current = thread::current();
    let thread_name = current.name().unwrap_or("unnamed");
    format!("[{seconds} {thread_name}] {msg}\n")
}

fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    let mut slot = DEBUG_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = if enabled {
        CappedLog::open(log_file_path(), DEBUG_LOG_LIMIT)
    } else {
        None
    };
}

/// Turn file logging on for `--logs` / `RESMAN_LOGS` unless `--no-logs` wins.
pub fn init_logging(config: &AppConfig) {
    set_enabled(config.logs_enabled());
}

pub fn log_debug(msg: &str) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = record(msg);
    let mut slot = DEBUG_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(log) = slot.as_mut() {
        log.append(&line);
    }
}

fn panic_message(info: &panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Record a panic in the crash log. Called from the terminal panic hook.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    let line = record(&format!(
        "panic at {location}: {} (v{})",
        panic_message(info),
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(mut crash_log) = CappedLog::open(crash_log_path(), CRASH_LOG_LIMIT) {
        crash_log.append(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        env::temp_dir().join(format!("resman-{name}-{stamp}.log"))
    }

    #[test]
    fn capped_log_starts_over_when_full() {
        let path = scratch("cap");
        let mut log = CappedLog::open(path.clone(), 16).expect("open log");
        log.append("0123456789\n");
        log.append("abcdefghij\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdefghij\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn oversized_log_is_truncated_on_open() {
        let path = scratch("oversized");
        fs::write(&path, "x".repeat(64)).unwrap();
        let log = CappedLog::open(path.clone(), 32).expect("open log");
        assert_eq!(log.len, 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn records_name_the_writing_thread() {
        let line = thread::Builder::new()
            .name("resman-countdown".to_string())
            .spawn(|| record("expired"))
            .unwrap()
            .join()
            .unwrap();
        assert!(line.contains(" resman-countdown] expired"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn disabled_logging_keeps_no_file_open() {
        set_enabled(false);
        log_debug("dropped");
        assert!(DEBUG_LOG.lock().unwrap().is_none());
    }

    #[test]
    fn log_paths_live_in_temp_dir() {
        assert!(log_file_path().starts_with(env::temp_dir()));
        assert!(crash_log_path().starts_with(env::temp_dir()));
    }
}
