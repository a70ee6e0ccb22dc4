//! Unit tests for raw key decoding

use rzterm::terminal::{decode, KeyDecoder, KeyEvent};

#[cfg(test)]
mod key_decoding_tests {
    use super::*;

    #[test]
    fn test_every_printable_ascii_byte_is_a_char() {
        for byte in 0x20u8..0x7f {
            assert_eq!(decode(&[byte]), KeyEvent::Char(byte as char));
        }
    }

    #[test]
    fn test_control_bytes_without_meaning_are_ignored() {
        for byte in [0x00u8, 0x02, 0x04, 0x06, 0x0b, 0x0c, 0x1a] {
            assert_eq!(decode(&[byte]), KeyEvent::Ignored, "byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_pasted_line_splits_into_keys() {
        let mut decoder = KeyDecoder::new();
        let events = decoder.feed(b"pd 2\r");

        assert_eq!(
            events,
            vec![
                KeyEvent::Char('p'),
                KeyEvent::Char('d'),
                KeyEvent::Char(' '),
                KeyEvent::Char('2'),
                KeyEvent::Submit,
            ]
        );
    }

    #[test]
    fn test_escape_sequences_inside_one_read() {
        let mut decoder = KeyDecoder::new();
        let events = decoder.feed(b"a\x1b[Db\x1b[3~\x1b[A");

        assert_eq!(
            events,
            vec![
                KeyEvent::Char('a'),
                KeyEvent::MoveLeft,
                KeyEvent::Char('b'),
                KeyEvent::DeleteForward,
                KeyEvent::HistoryPrev,
            ]
        );
    }

    #[test]
    fn test_sequence_split_across_reads() {
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"\x1b[").is_empty());
        assert!(decoder.has_pending());

        assert_eq!(decoder.feed(b"3"), vec![]);
        assert_eq!(decoder.feed(b"~x"), vec![KeyEvent::DeleteForward, KeyEvent::Char('x')]);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let mut decoder = KeyDecoder::new();
        let bytes = "漢".as_bytes();

        assert!(decoder.feed(&bytes[..1]).is_empty());
        assert!(decoder.feed(&bytes[1..2]).is_empty());
        assert_eq!(decoder.feed(&bytes[2..]), vec![KeyEvent::Char('漢')]);
    }

    #[test]
    fn test_unknown_sequence_swallowed_whole() {
        let mut decoder = KeyDecoder::new();
        let events = decoder.feed(b"\x1b[1;5Cz\x1b[15~");
        assert_eq!(events, vec![KeyEvent::Ignored, KeyEvent::Char('z'), KeyEvent::Ignored]);
    }

    #[test]
    fn test_ss3_keys_never_insert_text() {
        for seq in [&b"\x1bOP"[..], b"\x1bOQ", b"\x1bOH", b"\x1bOF", b"\x1bOA", b"\x1bOD"] {
            let events = KeyDecoder::new().feed(seq);
            assert_eq!(events, vec![KeyEvent::Ignored], "sequence {:?}", seq);
        }
    }

    #[test]
    fn test_ss3_split_across_reads() {
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"ab\x1bO").len() == 2);
        assert!(decoder.has_pending());
        assert_eq!(decoder.feed(b"Pc"), vec![KeyEvent::Ignored, KeyEvent::Char('c')]);
    }

    #[test]
    fn test_crlf_is_one_submit() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.feed(b"\r\n"), vec![KeyEvent::Submit]);
        assert_eq!(decoder.feed(b"\n\n"), vec![KeyEvent::Submit, KeyEvent::Submit]);
    }

    #[test]
    fn test_lone_escape_and_alt_keys() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.feed(b"\x1b"), vec![KeyEvent::Ignored]);
        assert_eq!(decoder.feed(b"\x1bf"), vec![KeyEvent::Ignored]);
        assert!(!decoder.has_pending());
    }
}
