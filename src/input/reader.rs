//! Blocking single-key reads from the controlling terminal.

use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::os::unix::io::RawFd;
use std::time::{Duration, Instant};

use super::{decode_key, needs_more_input, Key, KeySource};
use crate::log_debug;
use crate::terminal_restore::RawModeGuard;

/// How long to wait for the rest of an escape sequence after a lone ESC.
const ESCAPE_SEQUENCE_WAIT: Duration = Duration::from_millis(25);

const READ_CHUNK: usize = 64;

/// Reads keys from a terminal fd, switching it to raw mode only while a
/// read is in progress.
pub struct TerminalKeyReader {
    fd: RawFd,
    pending: VecDeque<u8>,
    /// Raw mode kept across consecutive polls so keys typed between them are not echoed.
    polling_raw: Option<RawModeGuard>,
}

impl TerminalKeyReader {
    pub fn stdin() -> Self {
        Self {
            fd: libc::STDIN_FILENO,
            pending: VecDeque::new(),
            polling_raw: None,
        }
    }

    /// Read whatever is available, waiting at most `timeout` (`None` blocks).
    /// Returns `false` when nothing arrived.
    fn fill(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        if !wait_readable(self.fd, timeout)? {
            return Ok(false);
        }
        let mut buffer = [0u8; READ_CHUNK];
        let n = unsafe {
            // SAFETY: buffer is valid for READ_CHUNK bytes for the duration of the call.
            libc::read(
                self.fd,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
            )
        };
        if n > 0 {
            self.pending
                .extend(buffer.get(..n as usize).unwrap_or(&[]).iter().copied());
            return Ok(true);
        }
        if n == 0 {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "terminal input closed",
            ));
        }
        let err = io::Error::last_os_error();
        if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) {
            return Ok(false);
        }
        log_debug(&format!("key read error: {err}"));
        Err(err)
    }

    /// Pop one decoded key, giving a started escape sequence a short window to finish.
    fn take_key(&mut self) -> io::Result<Option<Key>> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        while needs_more_input(self.pending.make_contiguous()) {
            if !self.fill(Some(ESCAPE_SEQUENCE_WAIT))? {
                break;
            }
        }
        let Some((key, used)) = decode_key(self.pending.make_contiguous()) else {
            return Ok(None);
        };
        self.pending.drain(..used);
        Ok(Some(key))
    }
}

impl KeySource for TerminalKeyReader {
    fn read_key(&mut self) -> io::Result<Key> {
        let _raw = RawModeGuard::acquire()?;
        loop {
            if let Some(key) = self.take_key()? {
                return Ok(key);
            }
            self.fill(None)?;
        }
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if self.polling_raw.is_none() {
            self.polling_raw = Some(RawModeGuard::acquire()?);
        }
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(key) = self.take_key()? {
                return Ok(Some(key));
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            self.fill(Some(remaining))?;
        }
    }

    fn finish_polling(&mut self) {
        self.polling_raw = None;
    }
}

/// `poll(2)` for readability. Interrupted waits report "not ready".
fn wait_readable(fd: RawFd, timeout: Option<Duration>) -> io::Result<bool> {
    let timeout_ms: libc::c_int = match timeout {
        None => -1,
        Some(duration) => duration.as_millis().min(libc::c_int::MAX as u128) as libc::c_int,
    };
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let rc = unsafe {
        // SAFETY: pollfd is a single valid, initialized entry.
        libc::poll(&mut pollfd, 1, timeout_ms)
    };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(rc > 0)
}
