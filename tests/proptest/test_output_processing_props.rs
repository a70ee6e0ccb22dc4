//! Property-based tests for output processing

use proptest::prelude::*;
use rzterm::models::LineClass;
use rzterm::terminal::{classify_stderr, classify_stdout, sanitize, sanitize_bytes};

proptest! {
    #[test]
    fn test_sanitize_is_idempotent(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        let once = sanitize_bytes(&data);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitize_idempotent_on_text(s in "\\PC{0,300}") {
        let once = sanitize(&s);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitize_idempotent_on_escape_heavy_text(
        parts in prop::collection::vec(
            prop_oneof![
                Just("\x1b".to_string()),
                Just("[".to_string()),
                Just("2K".to_string()),
                Just("31m".to_string()),
                Just("\u{2502}".to_string()),
                Just("\u{FFE2}".to_string()),
                Just("\u{FF94}".to_string()),
                Just("\u{FF80}".to_string()),
                "[a-z0-9;]{0,3}",
            ],
            0..40,
        )
    ) {
        let text: String = parts.concat();
        let once = sanitize(&text);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitized_text_is_printable(data in prop::collection::vec(any::<u8>(), 0..500)) {
        let clean = sanitize_bytes(&data);
        prop_assert!(clean
            .chars()
            .all(|c| matches!(c, '\n' | '\r' | '\t' | ' '..='~')));
    }

    #[test]
    fn test_stderr_lines_never_blank(text in "[ -~\\n]{0,300}") {
        for line in classify_stderr(&text) {
            prop_assert!(!line.text.trim().is_empty());
            prop_assert_ne!(line.class, LineClass::Plain);
        }
    }

    #[test]
    fn test_stdout_preserves_line_order(lines in prop::collection::vec("[a-z0-9 ]{1,30}", 1..20)) {
        let text = lines.join("\n");
        let classified = classify_stdout(&text);

        if text.trim().is_empty() {
            prop_assert!(classified.is_empty());
        } else {
            let texts: Vec<String> = classified.into_iter().map(|l| l.text).collect();
            prop_assert_eq!(texts, lines);
        }
    }
}
