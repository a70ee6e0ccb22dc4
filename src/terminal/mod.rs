//! Terminal Surface
//!
//! Everything between the raw terminal byte stream and the command
//! dispatcher: key decoding, line editing, output sanitizing and
//! classification, prompt rendering, and the console that ties them together.

pub mod console;
pub mod editor;
pub mod input;
pub mod output;
pub mod prompt;

// Re-exports for convenience
pub use console::{is_quit_command, Console, QUIT_COMMANDS};
pub use editor::{EditAction, EditOutcome, LineEditor};
pub use input::{decode, KeyDecoder, KeyEvent};
pub use output::{classify_line, classify_stderr, classify_stdout, sanitize, sanitize_bytes};
pub use prompt::{normalize_address, PromptRenderer, DEFAULT_ADDRESS};
