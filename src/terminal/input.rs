//! Raw Key Input Decoding
//!
//! Turns the bytes a terminal sends for one keypress into a single
//! [`KeyEvent`]. Recognized byte forms are matched exactly; an escape
//! sequence that is not in the table is swallowed whole as
//! [`KeyEvent::Ignored`] instead of leaking its tail as printable text.

/// One semantic key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A printable character
    Char(char),
    /// Ctrl-C
    Interrupt,
    /// Enter
    Submit,
    /// Left arrow
    MoveLeft,
    /// Right arrow
    MoveRight,
    /// Home or Ctrl-A
    Home,
    /// End or Ctrl-E
    End,
    /// Backspace / DEL
    Backspace,
    /// Delete key
    DeleteForward,
    /// Up arrow
    HistoryPrev,
    /// Down arrow
    HistoryNext,
    /// Tab, unknown escapes and anything else without meaning here
    Ignored,
}

const ESC: u8 = 0x1b;

/// Decode one atomic input chunk (the bytes of a single keypress)
pub fn decode(chunk: &[u8]) -> KeyEvent {
    match chunk {
        [0x03] => KeyEvent::Interrupt,
        b"\r" | b"\n" => KeyEvent::Submit,
        b"\x1b[A" => KeyEvent::HistoryPrev,
        b"\x1b[B" => KeyEvent::HistoryNext,
        b"\x1b[D" => KeyEvent::MoveLeft,
        b"\x1b[C" => KeyEvent::MoveRight,
        b"\x1b[H" | [0x01] => KeyEvent::Home,
        b"\x1b[F" | [0x05] => KeyEvent::End,
        [0x7f] | [0x08] => KeyEvent::Backspace,
        b"\x1b[3~" => KeyEvent::DeleteForward,
        b"\t" => KeyEvent::Ignored,
        _ => decode_char(chunk),
    }
}

/// A chunk holding exactly one character at or above space
fn decode_char(chunk: &[u8]) -> KeyEvent {
    let Ok(text) = std::str::from_utf8(chunk) else {
        return KeyEvent::Ignored;
    };

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c >= ' ' && c != '\x7f' => KeyEvent::Char(c),
        _ => KeyEvent::Ignored,
    }
}

/// Splits raw terminal reads into per-key chunks.
///
/// A single `read` from a raw-mode terminal can carry several keys (pasted
/// text) or only part of one (a CSI sequence or UTF-8 character cut at the
/// buffer edge). Incomplete tails are held back until the next `feed`.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning decoded events in arrival order
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        self.pending.extend_from_slice(bytes);
        let buffer = std::mem::take(&mut self.pending);

        let mut events = Vec::new();
        let mut pos = 0;
        while pos < buffer.len() {
            match chunk_len(&buffer[pos..]) {
                ChunkLen::Complete(len) => {
                    events.push(decode(&buffer[pos..pos + len]));
                    pos += len;
                    // CRLF from pasted text is one line break
                    if buffer[pos - len] == b'\r' && len == 1 && buffer.get(pos) == Some(&b'\n') {
                        pos += 1;
                    }
                }
                ChunkLen::Incomplete => {
                    self.pending.extend_from_slice(&buffer[pos..]);
                    break;
                }
            }
        }

        events
    }

    /// Whether part of a key is still buffered
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

enum ChunkLen {
    Complete(usize),
    Incomplete,
}

fn chunk_len(bytes: &[u8]) -> ChunkLen {
    match bytes {
        [] => ChunkLen::Complete(0),
        // Lone ESC at the end of a read is the Escape key itself
        [ESC] => ChunkLen::Complete(1),
        [ESC, b'[', rest @ ..] => csi_len(rest),
        // SS3: `ESC O final`, sent for F1-F4 and application-mode cursor keys
        [ESC, b'O'] => ChunkLen::Incomplete,
        [ESC, b'O', _, ..] => ChunkLen::Complete(3),
        [ESC, _, ..] => ChunkLen::Complete(2),
        [lead, ..] => {
            let len = utf8_len(*lead);
            if bytes.len() < len {
                ChunkLen::Incomplete
            } else {
                ChunkLen::Complete(len)
            }
        }
    }
}

/// Length of `ESC [ params intermediates final`, given the bytes after `ESC [`
fn csi_len(rest: &[u8]) -> ChunkLen {
    for (i, &b) in rest.iter().enumerate() {
        match b {
            0x20..=0x3f => continue,
            0x40..=0x7e => return ChunkLen::Complete(i + 3),
            // Malformed: end the sequence before the offending byte
            _ => return ChunkLen::Complete(i + 2),
        }
    }
    ChunkLen::Incomplete
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}
