//! Command execution against the engine
//!
//! A [`Session`] is the only path to the engine. Commands are rewritten to
//! carry their analysis prerequisite, queued single-flight on the engine
//! worker, and come back as sanitized [`crate::models::ExecutionResult`]s.

pub mod events;
pub mod payload;
pub mod rewrite;
pub mod session;

pub use events::{EngineEvent, OutputBus, OutputSubscription};
pub use payload::{decode_payload, decode_payload_as, Decoded};
pub use rewrite::{needs_analysis, rewrite_command, ANALYSIS_PREFIXES, ANALYSIS_TOKEN};
pub use session::{AnalysisSummary, Session, DEFAULT_HEX_LENGTH};
