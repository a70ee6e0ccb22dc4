//! Analysis prerequisite injection
//!
//! Several display commands only work once the engine has built its function
//! and cross-reference database. Because every call starts from a freshly
//! loaded target, such commands get the base analysis pass prepended.

/// Base analysis invocation
pub const ANALYSIS_TOKEN: &str = "aa";

/// Command prefixes that need the analysis database
pub const ANALYSIS_PREFIXES: &[&str] = &["pdf", "afl", "afn", "agf", "agc", "VV", "ax", "af", "pd "];

/// Whether a `;`-separated part is a seek
fn is_seek(part: &str) -> bool {
    part == "s" || part.starts_with("s ")
}

/// Whether `command` needs the analysis pass injected.
///
/// True when some part starts with an analysis-dependent prefix, no part is a
/// seek, and the command does not already mention the analysis token.
pub fn needs_analysis(command: &str) -> bool {
    if command.contains(ANALYSIS_TOKEN) {
        return false;
    }

    let parts: Vec<&str> = command.trim().split(';').map(str::trim).collect();
    if parts.iter().any(|part| is_seek(part)) {
        return false;
    }

    parts
        .iter()
        .any(|part| ANALYSIS_PREFIXES.iter().any(|prefix| part.starts_with(prefix)))
}

/// The command as it should reach the engine
pub fn rewrite_command(command: &str) -> String {
    if needs_analysis(command) {
        format!("{};{}", ANALYSIS_TOKEN, command)
    } else {
        command.to_string()
    }
}
