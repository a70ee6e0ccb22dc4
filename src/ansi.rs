//! ANSI styling for console output
//!
//! Every styled span written by rzterm is wrapped in one SGR prefix and
//! closed with the standard reset, so no style ever leaks into the next line.

use crate::models::LineClass;

/// SGR reset sequence
pub const RESET: &str = "\x1b[0m";

/// Text styles used on the display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Bright red, for errors
    BrightRed,
    /// Cyan, for command help
    Cyan,
    /// Yellow, for warnings
    Yellow,
    /// Bold yellow, for the prompt
    BoldYellow,
    /// Green, for connection notices
    Green,
    /// Dim grey, for informational banner lines
    Grey,
    /// No styling at all
    Plain,
}

impl Style {
    /// SGR prefix for this style (empty for `Plain`)
    pub fn prefix(self) -> &'static str {
        match self {
            Style::BrightRed => "\x1b[91m",
            Style::Cyan => "\x1b[36m",
            Style::Yellow => "\x1b[33m",
            Style::BoldYellow => "\x1b[1;33m",
            Style::Green => "\x1b[32m",
            Style::Grey => "\x1b[90m",
            Style::Plain => "",
        }
    }

    /// Style used to display a line of the given class
    pub fn for_class(class: LineClass) -> Self {
        match class {
            LineClass::Error => Style::BrightRed,
            LineClass::Help => Style::Cyan,
            LineClass::Warning => Style::Yellow,
            LineClass::Plain => Style::Plain,
        }
    }

    /// Wrap `text` in this style
    pub fn paint(self, text: &str) -> String {
        match self {
            Style::Plain => text.to_string(),
            style => format!("{}{}{}", style.prefix(), text, RESET),
        }
    }
}

/// Cursor movement sequences
pub mod cursor {
    /// Move the cursor `n` columns left (empty when `n == 0`)
    pub fn left(n: usize) -> String {
        match n {
            0 => String::new(),
            1 => "\x1b[D".to_string(),
            n => format!("\x1b[{}D", n),
        }
    }

    /// Move the cursor `n` columns right (empty when `n == 0`)
    pub fn right(n: usize) -> String {
        match n {
            0 => String::new(),
            1 => "\x1b[C".to_string(),
            n => format!("\x1b[{}C", n),
        }
    }

    /// Erase the whole current line and return to column 0
    pub const CLEAR_LINE: &str = "\x1b[2K\r";
}
