//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus};
use super::widgets::{
    editor::EditorPanel, header::Header, reference::ReferencePanel, result::ResultPanel,
    spinner::Spinner, test_cases::TestCasesPanel,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Height of the test case panel: one line per case plus borders.
const TEST_PANEL_HEIGHT: u16 = 7;

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(frame.area());

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_layout[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(TEST_PANEL_HEIGHT),
        ])
        .split(content[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(3)])
        .split(content[1]);

    render_header(frame, main_layout[0], app);
    render_reference(frame, left[0], app);
    frame.render_widget(TestCasesPanel::new(app.suite.cases()), left[1]);
    render_editor(frame, right[0], app);
    frame.render_widget(
        ResultPanel::new(&app.result, app.result_scroll, app.focus == Focus::Result),
        right[1],
    );
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let spinner = app
        .busy_since()
        .map(|since| Spinner::new(since, "Working"));
    frame.render_widget(Header::new(&app.gateway_url, spinner.as_ref()), area);
}

fn render_reference(frame: &mut Frame, area: Rect, app: &App) {
    let widget = ReferencePanel::new(
        &app.reference_table,
        app.reference.as_ref(),
        app.reference_scroll,
        app.focus == Focus::Reference,
    );
    frame.render_widget(widget, area);
}

fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Editor;
    let widget = EditorPanel::new(&app.editor, focused);
    let cursor = widget.cursor_position(area);
    frame.render_widget(widget, area);

    if focused {
        frame.set_cursor_position(cursor);
    }
}
