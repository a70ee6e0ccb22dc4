//! Unit tests for output processing

use rzterm::models::{ExecutionResult, LineClass, StreamType};
use rzterm::terminal::{classify_stderr, classify_stdout, sanitize, sanitize_bytes};

#[cfg(test)]
mod output_processing_tests {
    use super::*;

    #[test]
    fn test_stderr_example_classification() {
        let raw = "ERROR: invalid address\nNeither hash nor gnu_hash table found\nwarn: generic\n";
        let lines = classify_stderr(raw);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].class, LineClass::Error);
        assert_eq!(lines[0].text, "ERROR: invalid address");
        assert_eq!(lines[1].class, LineClass::Warning);
        assert_eq!(lines[1].text, "warn: generic");
        assert!(lines.iter().all(|l| l.stream == StreamType::Stderr));
    }

    #[test]
    fn test_help_lines() {
        let raw = "Usage: pd[f] [n]\n| pdf   disassemble function\n|  pdi  instructions\n";
        let lines = classify_stderr(raw);

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.class == LineClass::Help));
    }

    #[test]
    fn test_noise_suppressed_anywhere_in_line() {
        let raw = "  rz_config_node_desc: assertion 'node' failed\nwarn: x\n";
        let lines = classify_stderr(raw);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "warn: x");
    }

    #[test]
    fn test_colored_stderr_is_classified_after_stripping() {
        let lines = classify_stderr("\x1b[31mERROR: bad\x1b[0m\n");
        assert_eq!(lines[0].class, LineClass::Error);
        assert_eq!(lines[0].text, "ERROR: bad");
    }

    #[test]
    fn test_stdout_lines_are_plain_and_ordered() {
        let lines = classify_stdout("0x1000 main\n\n0x2000 entry0\n");

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.class == LineClass::Plain));
        assert_eq!(lines[0].text, "0x1000 main");
        assert_eq!(lines[1].text, "");
        assert_eq!(lines[2].line_number, 2);
    }

    #[test]
    fn test_blank_stdout_produces_nothing() {
        assert!(classify_stdout("").is_empty());
        assert!(classify_stdout("\n\n  \n").is_empty());
        assert!(classify_stdout("\x1b[0m\n").is_empty());
    }

    #[test]
    fn test_sanitize_strips_sequences_and_glyphs() {
        assert_eq!(sanitize("\x1b[1;32mgreen\x1b[0m"), "green");
        assert_eq!(sanitize("[2Kline"), "line");
        assert_eq!(sanitize("\u{2502} mov eax, 1"), "| mov eax, 1");
        assert_eq!(sanitize("\u{250C}\u{2500}\u{2500}"), "+--");
        assert_eq!(sanitize("caf\u{00e9}\u{0007}"), "caf");
        assert_eq!(sanitize("a\tb\r\n"), "a\tb\r\n");
    }

    #[test]
    fn test_cursor_visibility_toggles_leave_no_residue() {
        let lines = classify_stdout("\x1b[?25l0x1000 main\x1b[?25h\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "0x1000 main");
    }

    #[test]
    fn test_sanitize_repairs_mojibake() {
        // U+2500 is E2 94 80; each byte shown as a halfwidth form
        assert_eq!(sanitize("\u{FFE2}\u{FF94}\u{FF80}x"), "-x");
    }

    #[test]
    fn test_sanitize_bytes_drops_invalid_utf8() {
        assert_eq!(sanitize_bytes(b"ok\xff\xfe!"), "ok!");
    }

    #[test]
    fn test_result_lines_put_stderr_first() {
        let result = ExecutionResult::completed(
            "iz",
            "iz",
            "str.a\n".to_string(),
            "warn: slow\n".to_string(),
        );
        let lines = result.lines();

        assert_eq!(lines[0].stream, StreamType::Stderr);
        assert_eq!(lines[1].stream, StreamType::Stdout);
    }
}
