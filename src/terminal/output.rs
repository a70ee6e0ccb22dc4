//! Output Sanitization and Classification
//!
//! Cleans text captured from the engine's output channels and tags each line
//! of the error channel with a display class. Both steps are total: any input
//! produces some output and nothing here can fail.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{LineClass, OutputLine, StreamType};

/// CSI sequences: `ESC [ params intermediates final`, private modes included
static CSI_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]").expect("CSI pattern is valid"));

/// Cursor-clear sequences that reach us with their ESC already stripped
const LEGACY_CLEARS: &[&str] = &["[2K"];

/// Diagnostics the engine repeats on almost every call; never shown
pub const NOISE_PATTERNS: &[&str] = &[
    "Neither hash nor gnu_hash",
    "rz_config_node_desc: assertion",
];

/// Lead byte of a mis-decoded three-byte UTF-8 box glyph (0xE2 as halfwidth form)
const MOJIBAKE_LEAD: char = '\u{FFE2}';

/// Sanitize engine text.
///
/// Removes CSI and legacy cursor-clear sequences, folds box-drawing glyphs
/// (including their mis-decoded halfwidth forms) to `-`, `|` or `+`, and drops
/// everything outside printable ASCII, newline, carriage return and tab.
///
/// Applying it twice gives the same result as applying it once.
pub fn sanitize(text: &str) -> String {
    let mut current = sanitize_pass(text);
    loop {
        // Every pass that changes the text makes it strictly shorter.
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Sanitize raw channel bytes; invalid UTF-8 is dropped.
pub fn sanitize_bytes(bytes: &[u8]) -> String {
    sanitize(&String::from_utf8_lossy(bytes))
}

fn sanitize_pass(text: &str) -> String {
    let mut stripped = CSI_SEQUENCE.replace_all(text, "").into_owned();
    for seq in LEGACY_CLEARS {
        if stripped.contains(seq) {
            stripped = stripped.replace(seq, "");
        }
    }

    normalize_glyphs(&stripped)
        .chars()
        .filter(|&c| is_kept(c))
        .collect()
}

fn is_kept(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\t' | ' '..='~')
}

/// Replace box-drawing glyphs with ASCII, repairing mojibake triples first.
fn normalize_glyphs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == MOJIBAKE_LEAD && i + 2 < chars.len() {
            if let Some(glyph) = repair_mojibake(chars[i + 1], chars[i + 2]) {
                if let Some(ascii) = box_ascii(glyph) {
                    out.push(ascii);
                }
                i += 3;
                continue;
            }
        }

        match box_ascii(chars[i]) {
            Some(ascii) => out.push(ascii),
            None => out.push(chars[i]),
        }
        i += 1;
    }

    out
}

/// Rebuild the glyph whose UTF-8 bytes `E2 b1 b2` were shown as halfwidth forms
fn repair_mojibake(second: char, third: char) -> Option<char> {
    let continuation = |c: char| -> Option<u8> {
        let code = c as u32;
        (0xFF80..=0xFFBF).contains(&code).then(|| (code - 0xFF00) as u8)
    };

    let bytes = [0xE2, continuation(second)?, continuation(third)?];
    std::str::from_utf8(&bytes).ok()?.chars().next()
}

/// ASCII stand-in for a line-drawing glyph
fn box_ascii(c: char) -> Option<char> {
    match c {
        '\u{2014}' | '\u{2015}' => Some('-'),
        '\u{2500}'..='\u{257F}' => Some(match c {
            '\u{2502}' | '\u{2503}' | '\u{2506}' | '\u{2507}' | '\u{250A}' | '\u{250B}'
            | '\u{2551}' | '\u{2575}' | '\u{2577}' | '\u{2579}' | '\u{257B}' | '\u{257D}'
            | '\u{257F}' => '|',
            '\u{2500}' | '\u{2501}' | '\u{2504}' | '\u{2505}' | '\u{2508}' | '\u{2509}'
            | '\u{254C}' | '\u{254D}' | '\u{2550}' | '\u{2574}' | '\u{2576}' | '\u{2578}'
            | '\u{257A}' | '\u{257C}' | '\u{257E}' => '-',
            _ => '+',
        }),
        _ => None,
    }
}

/// Whether a diagnostic line is on the suppression list
pub fn is_noise(line: &str) -> bool {
    NOISE_PATTERNS.iter().any(|pattern| line.contains(pattern))
}

/// Class of one non-blank error-channel line; first matching prefix wins
pub fn classify_line(line: &str) -> LineClass {
    if line.starts_with("ERROR:") {
        LineClass::Error
    } else if line.starts_with("Usage:") || line.starts_with('|') {
        LineClass::Help
    } else {
        LineClass::Warning
    }
}

/// Split error-channel text into classified lines, dropping blanks and noise
pub fn classify_stderr(text: &str) -> Vec<OutputLine> {
    let clean = sanitize(text);
    let mut suppressed = 0usize;

    let lines: Vec<OutputLine> = clean
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| {
            let noisy = is_noise(line);
            suppressed += usize::from(noisy);
            !noisy
        })
        .enumerate()
        .map(|(n, line)| {
            OutputLine::new(line, classify_line(line), StreamType::Stderr).at_line(n)
        })
        .collect();

    if suppressed > 0 {
        debug!("Suppressed {} noisy diagnostic line(s)", suppressed);
    }

    lines
}

/// Split standard-output text into plain lines, keeping interior blank lines
pub fn classify_stdout(text: &str) -> Vec<OutputLine> {
    let clean = sanitize(text);
    if clean.trim().is_empty() {
        return Vec::new();
    }

    clean
        .lines()
        .enumerate()
        .map(|(n, line)| OutputLine::plain(line).at_line(n))
        .collect()
}
