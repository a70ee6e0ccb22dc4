//! Console Driver
//!
//! Glues the key decoder, line editor, history recall and prompt together
//! over one display writer. The console never talks to the engine: it hands
//! submitted command lines back to the caller, and the caller feeds results
//! and fresh addresses back in for rendering.

use std::io::Write;

use super::editor::{EditAction, LineEditor};
use super::input::{KeyDecoder, KeyEvent};
use super::prompt::PromptRenderer;
use crate::ansi::{cursor, Style};
use crate::engine::TargetFile;
use crate::error::Result;
use crate::execution::AnalysisSummary;
use crate::history::{HistoryLog, HistoryNavigator};
use crate::models::ExecutionResult;

/// Command lines that end the session instead of reaching the engine
pub const QUIT_COMMANDS: &[&str] = &["q", "exit", ":quit"];

/// Whether `command` asks to leave the console
pub fn is_quit_command(command: &str) -> bool {
    QUIT_COMMANDS.contains(&command.trim())
}

/// Interactive console over a display writer
#[derive(Debug)]
pub struct Console<W: Write> {
    editor: LineEditor,
    navigator: HistoryNavigator,
    history: HistoryLog,
    prompt: PromptRenderer,
    decoder: KeyDecoder,
    out: W,
}

impl<W: Write> Console<W> {
    /// Create a console writing to `out` and recording into `history`
    pub fn new(out: W, history: HistoryLog) -> Self {
        Self {
            editor: LineEditor::new(),
            navigator: HistoryNavigator::new(),
            history,
            prompt: PromptRenderer::new(),
            decoder: KeyDecoder::new(),
            out,
        }
    }

    /// Process one raw read from the terminal. Returns the command lines
    /// submitted by it, in the order they were entered.
    pub fn handle_input(&mut self, bytes: &[u8]) -> Result<Vec<String>> {
        let mut submitted = Vec::new();
        for event in self.decoder.feed(bytes) {
            if let Some(command) = self.handle_event(event)? {
                submitted.push(command);
            }
        }
        self.out.flush()?;
        Ok(submitted)
    }

    /// Apply a single decoded key event
    pub fn handle_event(&mut self, event: KeyEvent) -> Result<Option<String>> {
        let outcome = self.editor.apply(event);
        self.out.write_all(outcome.echo.as_bytes())?;

        match outcome.action {
            EditAction::None => {}
            EditAction::Submitted(command) => {
                self.history.record(&command);
                self.navigator.reset();
                return Ok(Some(command));
            }
            EditAction::EmptySubmit | EditAction::Interrupted => {
                self.navigator.reset();
                self.out.write_all(self.prompt.last().as_bytes())?;
            }
            EditAction::HistoryPrev => {
                let current = self.editor.text();
                if let Some(entry) = self.navigator.prev(&self.history, &current) {
                    let redraw = self.editor.load(&entry, self.prompt.last());
                    self.out.write_all(redraw.as_bytes())?;
                }
            }
            EditAction::HistoryNext => {
                if let Some(entry) = self.navigator.next(&self.history) {
                    let redraw = self.editor.load(&entry, self.prompt.last());
                    self.out.write_all(redraw.as_bytes())?;
                }
            }
        }

        Ok(None)
    }

    /// Write the styled lines of one result, error channel first.
    ///
    /// A line being typed ahead is wiped first; [`Self::render_prompt`]
    /// paints it back.
    pub fn render_result(&mut self, result: &ExecutionResult) -> Result<()> {
        if !self.editor.is_empty() {
            self.out.write_all(cursor::CLEAR_LINE.as_bytes())?;
        }

        for line in result.lines() {
            let styled = Style::for_class(line.class).paint(&line.text);
            self.out.write_all(styled.as_bytes())?;
            self.out.write_all(b"\r\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Render the prompt for `address` followed by any pending input
    pub fn render_prompt(&mut self, address: &str) -> Result<()> {
        let prompt = self.prompt.render(address);
        let redraw = self.editor.repaint(&prompt);
        self.out.write_all(redraw.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Write the connect banner for a freshly opened file
    pub fn render_banner(&mut self, file: &TargetFile, summary: &AnalysisSummary) -> Result<()> {
        let lines = [
            Style::Green.paint("Connected to engine"),
            format!("File: {}", file.name),
            Style::Grey.paint(&format!(
                "Functions: {}, Strings: {}",
                summary.functions.len(),
                summary.strings.len()
            )),
            Style::Grey.paint("Type a command and press Enter. `q` quits."),
        ];

        for line in lines {
            self.out.write_all(line.as_bytes())?;
            self.out.write_all(b"\r\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// The line editor
    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// The command history
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// The history recall position
    pub fn navigator(&self) -> &HistoryNavigator {
        &self.navigator
    }

    /// The display writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Mutable access to the display writer
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consume the console, returning its history
    pub fn into_history(self) -> HistoryLog {
        self.history
    }
}
