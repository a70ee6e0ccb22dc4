//! Prompt Rendering
//!
//! The prompt shows the engine's current address as `[0x0000abcd]> `. The
//! address is always supplied by the caller after asking the engine; the
//! renderer only remembers the last prompt so history recall can repaint it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ansi::{Style, RESET};

/// Address shown when the engine cannot report one
pub const DEFAULT_ADDRESS: &str = "0x00000000";

static LEADING_HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*0[xX]([0-9a-fA-F]+)").expect("address pattern is valid"));

/// Normalize engine address text to `0x` plus at least eight hex digits.
/// Anything unparseable becomes [`DEFAULT_ADDRESS`].
pub fn normalize_address(raw: &str) -> String {
    LEADING_HEX
        .captures(raw)
        .and_then(|caps| u64::from_str_radix(&caps[1], 16).ok())
        .map(|value| format!("0x{:08x}", value))
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
}

/// Renders the address-aware prompt
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    last: String,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Create a renderer whose last prompt shows the default address
    pub fn new() -> Self {
        Self {
            last: Self::format(DEFAULT_ADDRESS),
        }
    }

    fn format(address: &str) -> String {
        format!("{}[{}]>{} ", Style::BoldYellow.prefix(), address, RESET)
    }

    /// Render the prompt for `address` and remember it
    pub fn render(&mut self, address: &str) -> String {
        self.last = Self::format(&normalize_address(address));
        self.last.clone()
    }

    /// The most recently rendered prompt
    pub fn last(&self) -> &str {
        &self.last
    }
}
