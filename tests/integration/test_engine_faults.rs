//! Integration Tests for Error Handling
//!
//! Engine faults must surface as one error line and leave the session usable.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use rzterm::engine::{OpenOptions, ProcessEngine};
use rzterm::error::Error;
use rzterm::execution::Session;
use rzterm::models::LineClass;
use test_utils::{target_file, ScriptedEngine};

#[tokio::test]
async fn test_fault_becomes_single_error_line() {
    let (engine, _probe) = ScriptedEngine::new();
    let session = Session::new(engine.fault("aa;pdf", "invalid function")).unwrap();

    let result = session.submit("pdf").await;
    assert!(result.is_fault());
    assert_eq!(result.dispatched, "aa;pdf");

    let lines = result.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].class, LineClass::Error);
    assert_eq!(lines[0].text, "Error: invalid function");
}

#[tokio::test]
async fn test_session_survives_fault() {
    let (engine, probe) = ScriptedEngine::new();
    let engine = engine.fault("px 8", "read failed").reply("iz", "str.hello\n");
    let session = Session::new(engine).unwrap();

    assert!(session.submit("px 8").await.is_fault());

    let next = session.submit("iz").await;
    assert!(!next.is_fault());
    assert_eq!(next.stdout, "str.hello\n");
    assert_eq!(probe.calls(), ["px 8", "iz"]);
}

#[tokio::test]
async fn test_engine_panic_is_contained() {
    let (engine, _probe) = ScriptedEngine::new();
    let engine = engine.panic_on("px 8", "engine exploded").reply("i", "file ok\n");
    let session = Session::new(engine).unwrap();

    let faulted = session.submit("px 8").await;
    assert_eq!(faulted.fault.as_deref(), Some("engine exploded"));

    let next = session.submit("i").await;
    assert_eq!(next.stdout, "file ok\n");
    assert_eq!(session.current_address().await, "0x00000000");
}

#[tokio::test]
async fn test_stderr_is_kept_for_accessor() {
    let (engine, _probe) = ScriptedEngine::new();
    let engine = engine.reply_with_stderr("pd 1", "nop\n", "ERROR: invalid address\n");
    let session = Session::new(engine).unwrap();

    let result = session.submit("pd 1").await;
    assert_eq!(session.last_stderr(), "ERROR: invalid address\n");

    let lines = result.lines();
    assert_eq!(lines[0].class, LineClass::Error);
    assert_eq!(lines[1].text, "nop");
    assert_eq!(lines[1].class, LineClass::Plain);

    session.submit("i").await;
    assert_eq!(session.last_stderr(), "");
}

#[tokio::test]
async fn test_unreadable_target_is_error() {
    let (engine, probe) = ScriptedEngine::new();
    let session = Session::new(engine).unwrap();
    let dir = tempfile::TempDir::new().unwrap();

    let result = session
        .open(&dir.path().join("missing.bin"), OpenOptions::default())
        .await;
    assert!(matches!(result, Err(Error::TargetUnreadable { .. })));

    let result = session.open(dir.path(), OpenOptions::default()).await;
    assert!(matches!(result, Err(Error::TargetUnreadable { .. })));
    assert!(probe.calls().is_empty());
}

#[tokio::test]
async fn test_missing_engine_program_faults_each_command() {
    let session = Session::new(ProcessEngine::new("rzterm-no-such-engine")).unwrap();
    let file = target_file(16);

    let summary = session
        .open(file.path(), OpenOptions::default())
        .await
        .unwrap();
    assert!(summary.functions.is_empty());

    let result = session.submit("iz").await;
    assert!(result.is_fault());
    assert!(result.lines()[0].text.contains("rzterm-no-such-engine"));
    assert_eq!(session.current_address().await, "0x00000000");
}

#[tokio::test]
async fn test_commands_before_open_report_no_file() {
    let session = Session::new(ProcessEngine::default()).unwrap();

    let result = session.submit("iz").await;
    assert!(!result.is_fault());
    assert_eq!(result.stdout, "Error: No file loaded");
}
