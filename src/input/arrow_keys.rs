//! Arrow-key escape sequences, normalized across terminals.

pub(crate) const ESC: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

#[inline]
fn map_arrow_final(byte: u8) -> Option<ArrowKey> {
    match byte {
        b'A' => Some(ArrowKey::Up),
        b'B' => Some(ArrowKey::Down),
        b'C' => Some(ArrowKey::Right),
        b'D' => Some(ArrowKey::Left),
        _ => None,
    }
}

#[inline]
fn is_csi_final(byte: u8) -> bool {
    (0x40..=0x7e).contains(&byte)
}

#[inline]
fn is_csi_param(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b';'
}

/// Shape of the escape sequence at the start of `bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeSequence {
    /// A complete arrow sequence of the given length.
    Arrow(ArrowKey, usize),
    /// A complete sequence that is not an arrow key.
    Unknown(usize),
    /// Bytes so far could still grow into a sequence.
    Incomplete,
    /// ESC followed by something that never starts a sequence.
    Bare,
}

/// Classify the sequence starting at `bytes[0]`, which must be ESC.
/// Handles `ESC [ A`, `ESC O A` and parameterized CSI such as `ESC [ 1 ; 5 A`.
pub(crate) fn classify_escape(bytes: &[u8]) -> EscapeSequence {
    debug_assert_eq!(bytes.first(), Some(&ESC));
    match bytes.get(1) {
        None => EscapeSequence::Incomplete,
        Some(b'O') => match bytes.get(2) {
            None => EscapeSequence::Incomplete,
            Some(&byte) => match map_arrow_final(byte) {
                Some(key) => EscapeSequence::Arrow(key, 3),
                None => EscapeSequence::Unknown(3),
            },
        },
        Some(b'[') => {
            let mut idx = 2;
            while let Some(&byte) = bytes.get(idx) {
                if let Some(key) = map_arrow_final(byte) {
                    return EscapeSequence::Arrow(key, idx + 1);
                }
                if is_csi_final(byte) {
                    return EscapeSequence::Unknown(idx + 1);
                }
                if is_csi_param(byte) {
                    idx += 1;
                    continue;
                }
                // Malformed: stop before the offending byte.
                return EscapeSequence::Unknown(idx);
            }
            EscapeSequence::Incomplete
        }
        Some(_) => EscapeSequence::Bare,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_plain_arrow_sequences() {
        assert_eq!(
            classify_escape(b"\x1b[A"),
            EscapeSequence::Arrow(ArrowKey::Up, 3)
        );
        assert_eq!(
            classify_escape(b"\x1b[B"),
            EscapeSequence::Arrow(ArrowKey::Down, 3)
        );
        assert_eq!(
            classify_escape(b"\x1bOC"),
            EscapeSequence::Arrow(ArrowKey::Right, 3)
        );
        assert_eq!(
            classify_escape(b"\x1b[Dxyz"),
            EscapeSequence::Arrow(ArrowKey::Left, 3)
        );
    }

    #[test]
    fn classifies_parameterized_csi_sequences() {
        assert_eq!(
            classify_escape(b"\x1b[1;5A"),
            EscapeSequence::Arrow(ArrowKey::Up, 6)
        );
        assert_eq!(
            classify_escape(b"\x1b[1;2P"),
            EscapeSequence::Unknown(6)
        );
    }

    #[test]
    fn partial_sequences_are_incomplete() {
        assert_eq!(classify_escape(b"\x1b"), EscapeSequence::Incomplete);
        assert_eq!(classify_escape(b"\x1b["), EscapeSequence::Incomplete);
        assert_eq!(classify_escape(b"\x1b[1;"), EscapeSequence::Incomplete);
        assert_eq!(classify_escape(b"\x1bO"), EscapeSequence::Incomplete);
    }

    #[test]
    fn non_sequences_are_bare_or_unknown() {
        assert_eq!(classify_escape(b"\x1bj"), EscapeSequence::Bare);
        assert_eq!(classify_escape(b"\x1b[\x07"), EscapeSequence::Unknown(2));
        assert_eq!(classify_escape(b"\x1bOx"), EscapeSequence::Unknown(3));
    }
}
