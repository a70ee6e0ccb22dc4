//! Integration Tests for console and session together
//!
//! Keystrokes go into a console writing to memory; submitted commands are run
//! on a scripted engine and their results rendered back.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use rzterm::engine::{OpenOptions, TargetFile};
use rzterm::execution::Session;
use rzterm::history::HistoryLog;
use rzterm::terminal::{is_quit_command, Console};
use test_utils::{screen, target_file, ScriptedEngine};

async fn run_keys(session: &Session, console: &mut Console<Vec<u8>>, keys: &[u8]) -> Vec<String> {
    let submitted = console.handle_input(keys).unwrap();
    for command in &submitted {
        let result = session.submit(command).await;
        let address = session.current_address().await;
        console.render_result(&result).unwrap();
        console.render_prompt(&address).unwrap();
    }
    submitted
}

#[tokio::test]
async fn test_connect_banner_and_first_prompt() {
    let (engine, _probe) = ScriptedEngine::new();
    let engine = engine
        .reply("aa;aflj", r#"[{"name":"main"}]"#)
        .reply("izzj", r#"[{"string":"a"},{"string":"b"}]"#);
    let session = Session::new(engine).unwrap();
    let file = target_file(32);
    let target = TargetFile::from_path(file.path()).unwrap();

    let summary = session
        .open(file.path(), OpenOptions::default())
        .await
        .unwrap();

    let mut console = Console::new(Vec::new(), HistoryLog::default());
    console.render_banner(&target, &summary).unwrap();
    console.render_prompt(&session.current_address().await).unwrap();

    let shown = screen(console.writer());
    assert!(shown.starts_with("\x1b[32mConnected to engine\x1b[0m\r\n"));
    assert!(shown.contains(&format!("File: {}\r\n", target.name)));
    assert!(shown.contains("Functions: 1, Strings: 2"));
    assert!(shown.ends_with("\x1b[1;33m[0x00000000]>\x1b[0m "));
}

#[tokio::test]
async fn test_typed_command_round_trip() {
    let (engine, probe) = ScriptedEngine::new();
    let engine = engine.reply_with_stderr(
        "aa;afl",
        "0x00001000    1     12 main\n",
        "ERROR: invalid address\nNeither hash nor gnu_hash table found\nwarn: generic\n",
    );
    let session = Session::new(engine).unwrap();
    let mut console = Console::new(Vec::new(), HistoryLog::default());

    let submitted = run_keys(&session, &mut console, b"afl\r").await;
    assert_eq!(submitted, ["afl"]);
    assert_eq!(probe.calls(), ["aa;afl"]);

    let shown = screen(console.writer());
    assert!(shown.starts_with("afl\r\n"));
    assert!(shown.contains("\x1b[91mERROR: invalid address\x1b[0m\r\n\x1b[33mwarn: generic\x1b[0m\r\n"));
    assert!(!shown.contains("gnu_hash"));
    assert!(shown.contains("0x00001000    1     12 main\r\n"));
    assert!(shown.ends_with("[0x00000000]>\x1b[0m "));

    assert_eq!(console.history().entries().len(), 1);
    assert!(!console.navigator().is_navigating());
}

#[tokio::test]
async fn test_prompt_follows_seek() {
    let (engine, _probe) = ScriptedEngine::new();
    let session = Session::new(engine).unwrap();
    let mut console = Console::new(Vec::new(), HistoryLog::default());

    run_keys(&session, &mut console, b"s 0x401a2f\r").await;
    assert!(screen(console.writer()).ends_with("\x1b[1;33m[0x00401a2f]>\x1b[0m "));
}

#[tokio::test]
async fn test_fault_renders_red_line_and_rearms_prompt() {
    let (engine, _probe) = ScriptedEngine::new();
    let session = Session::new(engine.fault("px 4", "bad read")).unwrap();
    let mut console = Console::new(Vec::new(), HistoryLog::default());

    run_keys(&session, &mut console, b"px 4\r").await;
    let shown = screen(console.writer());
    assert!(shown.contains("\x1b[91mError: bad read\x1b[0m\r\n"));
    assert!(shown.ends_with("]>\x1b[0m "));

    run_keys(&session, &mut console, b"i\r").await;
    assert_eq!(console.history().get(0), Some("i"));
    assert_eq!(console.history().get(1), Some("px 4"));
}

#[tokio::test]
async fn test_recall_and_resubmit() {
    let (engine, probe) = ScriptedEngine::new();
    let session = Session::new(engine).unwrap();
    let mut console = Console::new(Vec::new(), HistoryLog::default());

    run_keys(&session, &mut console, b"iz\rii\r").await;
    // Up twice reaches "iz", then edit and submit.
    run_keys(&session, &mut console, b"\x1b[A\x1b[A j\r").await;

    assert_eq!(probe.calls(), ["iz", "ii", "iz j"]);
    assert_eq!(console.history().get(0), Some("iz j"));
}

#[tokio::test]
async fn test_quit_commands_are_not_dispatched() {
    let (engine, probe) = ScriptedEngine::new();
    let session = Session::new(engine).unwrap();
    let mut console = Console::new(Vec::new(), HistoryLog::default());

    let submitted = console.handle_input(b"q\r").unwrap();
    assert!(submitted.iter().all(|c| is_quit_command(c)));
    assert!(probe.calls().is_empty());
    session.shutdown().await;
}

#[tokio::test]
async fn test_history_persists_across_consoles() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("history");
    let (engine, _probe) = ScriptedEngine::new();
    let session = Session::new(engine).unwrap();

    let log = HistoryLog::with_file(path.clone(), 1000, 100).unwrap();
    let mut console = Console::new(Vec::new(), log);
    run_keys(&session, &mut console, b"iz\rpx 8\r").await;
    drop(console);

    let reloaded = HistoryLog::with_file(path, 1000, 100).unwrap();
    assert_eq!(reloaded.get(0), Some("px 8"));
    assert_eq!(reloaded.get(1), Some("iz"));
}
