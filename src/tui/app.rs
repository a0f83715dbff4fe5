//! Application state for the TUI.
//!
//! Contains the main App struct and related types for managing UI state.
//! Key handling never performs I/O; it returns an [`Action`] that the event
//! loop turns into a background gateway call.

use super::events::Event;
use crate::db::QueryResult;
use crate::error::Result;
use crate::sandbox::{EditorState, ReferenceData, TestSuite};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Rows scrolled per PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Reference,
    Result,
}

impl Focus {
    /// Cycles to the next focus panel.
    pub fn next(self) -> Self {
        match self {
            Self::Editor => Self::Reference,
            Self::Reference => Self::Result,
            Self::Result => Self::Editor,
        }
    }
}

/// Work requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Run the editor text through the gateway.
    Execute(String),
    /// Run every test case.
    RunTests,
    /// Reload the schema and initial data.
    Reload,
}

/// Multi-line text buffer for the SQL editor.
///
/// The cursor is a (line, column) pair counted in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl EditorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `text` with the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let row = lines.len() - 1;
        let col = lines[row].chars().count();
        Self { lines, row, col }
    }

    /// The full text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (line, column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_index(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    /// Inserts a character at the cursor.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    /// Splits the current line at the cursor.
    pub fn newline(&mut self) {
        let at = self.byte_index();
        let rest = self.lines[self.row].split_off(at);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    /// Deletes the character before the cursor, joining lines at column 0.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_index();
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    /// Deletes the character at the cursor, joining lines at line end.
    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let at = self.byte_index();
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// SQL editor contents.
    pub editor: EditorBuffer,
    /// Outcome of the last editor execution.
    pub result: EditorState,
    /// Latest reference data, once loaded.
    pub reference: Option<ReferenceData>,
    /// Test cases and their verdicts.
    pub suite: TestSuite,
    /// Gateway URL for display.
    pub gateway_url: String,
    /// Table whose schema is shown.
    pub reference_table: String,
    /// Reference panel scroll offset.
    pub reference_scroll: usize,
    /// Result table scroll offset.
    pub result_scroll: usize,
    /// Number of gateway calls in flight.
    pending: usize,
    /// When the current busy period started.
    busy_since: Option<Instant>,
    /// Bumped on every test run and reset; only the latest run may land.
    test_generation: u64,
}

impl App {
    /// Creates a new App instance.
    pub fn new(gateway_url: impl Into<String>, reference_table: impl Into<String>) -> Self {
        Self {
            running: true,
            focus: Focus::default(),
            editor: EditorBuffer::new(),
            result: EditorState::new(),
            reference: None,
            suite: TestSuite::builtin(),
            gateway_url: gateway_url.into(),
            reference_table: reference_table.into(),
            reference_scroll: 0,
            result_scroll: 0,
            pending: 0,
            busy_since: None,
            test_generation: 0,
        }
    }

    /// Returns true while any gateway call is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    /// When the current busy period started.
    pub fn busy_since(&self) -> Option<Instant> {
        self.busy_since
    }

    /// Records that a gateway call was started.
    pub fn begin_request(&mut self) {
        if self.pending == 0 {
            self.busy_since = Some(Instant::now());
        }
        self.pending += 1;
    }

    /// Records that a gateway call finished.
    pub fn end_request(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.busy_since = None;
        }
    }

    /// Stores an editor execution outcome. Returns true on success.
    pub fn finish_query(&mut self, outcome: Result<QueryResult>) -> bool {
        self.end_request();
        self.result_scroll = 0;
        self.result.apply(outcome)
    }

    /// Replaces the reference data with a completed load.
    pub fn finish_reference(&mut self, data: ReferenceData) {
        self.end_request();
        self.reference = Some(data);
    }

    /// Records that a test run was started and returns its generation.
    pub fn begin_test_run(&mut self) -> u64 {
        self.begin_request();
        self.test_generation += 1;
        self.test_generation
    }

    /// Clears every verdict. Runs still in flight are discarded when they land.
    pub fn reset_tests(&mut self) {
        self.test_generation += 1;
        self.suite.reset();
    }

    /// Stores a completed test run unless a newer run or a reset superseded it.
    /// Returns true if the verdicts were applied.
    pub fn finish_tests(&mut self, generation: u64, verdicts: &[bool]) -> bool {
        self.end_request();
        if generation != self.test_generation {
            return false;
        }
        self.suite.apply(verdicts);
        true
    }

    /// Message shown when the reference data could not be fully loaded.
    pub fn reference_error(&self) -> Option<&str> {
        self.reference
            .as_ref()
            .and_then(|data| data.first_error())
            .map(|e| e.message())
    }

    /// Handles an event and updates application state.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) | Event::Tick => Action::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                Action::None
            }
            KeyCode::Enter if ctrl => Action::Execute(self.editor.text()),
            KeyCode::F(5) => Action::Execute(self.editor.text()),
            KeyCode::F(6) => Action::RunTests,
            KeyCode::F(2) => Action::Reload,
            KeyCode::Char('r') if ctrl => {
                self.reset_tests();
                Action::None
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                Action::None
            }
            _ => {
                match self.focus {
                    Focus::Editor => self.handle_editor_key(key),
                    Focus::Reference => Self::scroll(&mut self.reference_scroll, key.code),
                    Focus::Result => Self::scroll(&mut self.result_scroll, key.code),
                }
                Action::None
            }
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => self.editor.insert(c),
            KeyCode::Enter => self.editor.newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => {}
        }
    }

    fn scroll(offset: &mut usize, code: KeyCode) {
        match code {
            KeyCode::Up => *offset = offset.saturating_sub(1),
            KeyCode::Down => *offset = offset.saturating_add(1),
            KeyCode::PageUp => *offset = offset.saturating_sub(PAGE_SIZE),
            KeyCode::PageDown => *offset = offset.saturating_add(PAGE_SIZE),
            KeyCode::Home => *offset = 0,
            _ => {}
        }
    }
}
