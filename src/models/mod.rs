//! Core data models for rzterm
//!
//! Output lines and the captured result of one engine invocation.

pub mod execution_result;
pub mod output_line;

// Re-exports for convenience
pub use execution_result::ExecutionResult;
pub use output_line::{LineClass, OutputLine, StreamType};
