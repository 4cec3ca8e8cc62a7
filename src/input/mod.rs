//! Single-key input: decoding, menu bindings and the terminal reader.

mod arrow_keys;
mod reader;

pub use arrow_keys::ArrowKey;
pub use reader::TerminalKeyReader;

use arrow_keys::{classify_escape, EscapeSequence, ESC};
use std::io;
use std::time::Duration;

const CTRL_C: u8 = 0x03;

/// One normalized keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable ASCII.
    Char(char),
    Enter,
    Escape,
    Arrow(ArrowKey),
    /// Ctrl+C; raw mode delivers it as a byte instead of a signal.
    Interrupt,
    /// Any other control byte or non-ASCII byte.
    Other(u8),
}

impl Key {
    pub fn is_affirmative(self) -> bool {
        matches!(self, Key::Char('y') | Key::Char('Y'))
    }
}

/// Decode the first key in `bytes`, returning it with the number of bytes consumed.
///
/// Escape sequences that are not arrows (or are cut short) collapse to
/// [`Key::Escape`]; a bare ESC consumes only itself.
pub fn decode_key(bytes: &[u8]) -> Option<(Key, usize)> {
    let &first = bytes.first()?;
    let decoded = match first {
        ESC => match classify_escape(bytes) {
            EscapeSequence::Arrow(arrow, len) => (Key::Arrow(arrow), len),
            EscapeSequence::Unknown(len) => (Key::Escape, len),
            EscapeSequence::Incomplete => (Key::Escape, bytes.len()),
            EscapeSequence::Bare => (Key::Escape, 1),
        },
        b'\r' | b'\n' => (Key::Enter, 1),
        CTRL_C => (Key::Interrupt, 1),
        0x20..=0x7e => (Key::Char(first as char), 1),
        other => (Key::Other(other), 1),
    };
    Some(decoded)
}

/// True when `bytes` start with an escape sequence that more input could complete.
pub(crate) fn needs_more_input(bytes: &[u8]) -> bool {
    bytes.first() == Some(&ESC) && classify_escape(bytes) == EscapeSequence::Incomplete
}

/// Menu navigation derived from a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Up,
    Down,
    Select,
}

impl MenuCommand {
    /// `k`/up, `j`/down, Enter/`l`. Everything else is ignored.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Char('k') | Key::Arrow(ArrowKey::Up) => Some(MenuCommand::Up),
            Key::Char('j') | Key::Arrow(ArrowKey::Down) => Some(MenuCommand::Down),
            Key::Char('l') | Key::Enter => Some(MenuCommand::Select),
            _ => None,
        }
    }
}

/// Source of keypresses for the menu loop.
pub trait KeySource {
    /// Block until a key is available.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Wait at most `timeout` for a key. Terminal state may be held between
    /// polls until [`KeySource::finish_polling`].
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;

    fn finish_polling(&mut self) {}
}
