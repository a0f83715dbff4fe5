//! SQL editor widget.
//!
//! Shows the buffer with line numbers and scrolls vertically to keep the
//! cursor line visible.

use crate::tui::app::EditorBuffer;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width of the line-number gutter, including the trailing space.
const GUTTER_WIDTH: u16 = 4;

/// Editor panel widget.
pub struct EditorPanel<'a> {
    buffer: &'a EditorBuffer,
    focused: bool,
}

impl<'a> EditorPanel<'a> {
    pub fn new(buffer: &'a EditorBuffer, focused: bool) -> Self {
        Self { buffer, focused }
    }

    /// First visible line for a viewport of `height` lines.
    fn first_visible(&self, height: u16) -> usize {
        let (row, _) = self.buffer.cursor();
        let height = height.max(1) as usize;
        row.saturating_sub(height - 1)
    }

    /// Screen position of the cursor when the panel is drawn in `area`.
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner_height = area.height.saturating_sub(2);
        let (row, col) = self.buffer.cursor();
        let visible_row = row - self.first_visible(inner_height);
        let max_x = area.right().saturating_sub(2);
        let x = (area.x + 1 + GUTTER_WIDTH).saturating_add(col as u16).min(max_x);
        Position::new(x, area.y + 1 + visible_row as u16)
    }
}

impl Widget for EditorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" SQL Editor ")
            .title_bottom(" F5 Execute  F6 Run tests  Ctrl+R Reset tests  F2 Reload ");

        let inner_height = area.height.saturating_sub(2);
        let first = self.first_visible(inner_height);
        let gutter = Style::default().fg(Color::DarkGray);

        let lines: Vec<Line> = self
            .buffer
            .lines()
            .iter()
            .enumerate()
            .skip(first)
            .take(inner_height as usize)
            .map(|(i, text)| {
                Line::from(vec![
                    Span::styled(format!("{:>3} ", i + 1), gutter),
                    Span::raw(text.as_str()),
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
