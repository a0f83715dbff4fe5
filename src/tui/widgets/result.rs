//! Query result panel: the status line and the result table.

use super::table::RowTable;
use crate::sandbox::EditorState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Result panel widget.
pub struct ResultPanel<'a> {
    state: &'a EditorState,
    scroll: usize,
    focused: bool,
}

impl<'a> ResultPanel<'a> {
    pub fn new(state: &'a EditorState, scroll: usize, focused: bool) -> Self {
        Self {
            state,
            scroll,
            focused,
        }
    }

    /// Builds the panel content.
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if let Some(error) = &self.state.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        if !self.state.message.is_empty() {
            lines.push(Line::from(Span::styled(
                self.state.message.clone(),
                Style::default().fg(Color::Green),
            )));
        }
        if !self.state.rows.is_empty() {
            lines.push(Line::from(""));
            lines.extend(RowTable::new(&self.state.rows).render_to_lines(width));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "Run a query to see its result here.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines
    }
}

impl Widget for ResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Query Result ");

        let lines = self.lines(area.width.saturating_sub(2) as usize);
        let scroll = self.scroll.min(lines.len().saturating_sub(1)) as u16;

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
