//! Property-based tests for the line editor

use proptest::prelude::*;
use rzterm::terminal::{KeyDecoder, KeyEvent, LineEditor};

fn edit_event() -> impl Strategy<Value = KeyEvent> {
    prop_oneof![
        4 => prop::char::range(' ', '~').prop_map(KeyEvent::Char),
        1 => prop::sample::select(vec!['é', '漢', 'ß']).prop_map(KeyEvent::Char),
        2 => Just(KeyEvent::Backspace),
        2 => Just(KeyEvent::DeleteForward),
        2 => Just(KeyEvent::MoveLeft),
        2 => Just(KeyEvent::MoveRight),
        1 => Just(KeyEvent::Home),
        1 => Just(KeyEvent::End),
    ]
}

proptest! {
    #[test]
    fn test_cursor_stays_in_bounds(events in prop::collection::vec(edit_event(), 0..200)) {
        let mut editor = LineEditor::new();
        for event in events {
            editor.apply(event);
            prop_assert!(editor.cursor() <= editor.len());
        }
    }

    #[test]
    fn test_edge_deletes_are_noops(text in "[a-z ]{0,20}") {
        let mut editor = LineEditor::new();
        for c in text.chars() {
            editor.apply(KeyEvent::Char(c));
        }

        let outcome = editor.apply(KeyEvent::DeleteForward);
        prop_assert_eq!(outcome.echo, "");
        prop_assert_eq!(editor.text(), text.clone());
        prop_assert_eq!(editor.cursor(), editor.len());

        editor.apply(KeyEvent::Home);
        let outcome = editor.apply(KeyEvent::Backspace);
        prop_assert_eq!(outcome.echo, "");
        prop_assert_eq!(editor.text(), text);
        prop_assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_typed_text_is_buffer(text in "[ -~]{0,40}") {
        let mut editor = LineEditor::new();
        let mut decoder = KeyDecoder::new();
        for event in decoder.feed(text.as_bytes()) {
            editor.apply(event);
        }
        prop_assert_eq!(editor.text(), text);
    }

    #[test]
    fn test_decoder_never_panics(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..20)) {
        let mut decoder = KeyDecoder::new();
        let mut editor = LineEditor::new();
        for chunk in chunks {
            for event in decoder.feed(&chunk) {
                editor.apply(event);
                prop_assert!(editor.cursor() <= editor.len());
            }
        }
    }
}
