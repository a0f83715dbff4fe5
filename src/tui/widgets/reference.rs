//! Reference panel: the exercise text, the reference table's schema and the
//! initial data of every table.

use super::table::RowTable;
use crate::db::Row;
use crate::row;
use crate::sandbox::{ReferenceData, QUESTION_TEXT, QUESTION_TITLE};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Scrollable reference panel.
pub struct ReferencePanel<'a> {
    reference_table: &'a str,
    data: Option<&'a ReferenceData>,
    scroll: usize,
    focused: bool,
}

impl<'a> ReferencePanel<'a> {
    pub fn new(
        reference_table: &'a str,
        data: Option<&'a ReferenceData>,
        scroll: usize,
        focused: bool,
    ) -> Self {
        Self {
            reference_table,
            data,
            scroll,
            focused,
        }
    }

    /// Builds the panel content.
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::DarkGray);

        let mut lines = vec![
            Line::from(Span::styled(QUESTION_TITLE, heading)),
            Line::from(QUESTION_TEXT),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} table:", self.reference_table),
                Style::default().fg(Color::Cyan),
            )),
        ];

        let Some(data) = self.data else {
            lines.push(Line::from(Span::styled("Loading...", dim)));
            return lines;
        };

        // The schema is shown as a two-column table of its own.
        let schema: Vec<Row> = data
            .columns()
            .iter()
            .map(|c| row! {"Column" => c.name.as_str(), "Type" => c.data_type.as_str()})
            .collect();
        lines.extend(RowTable::new(&schema).render_to_lines(width));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Initial Data", heading)));

        if let Some(error) = data.first_error() {
            lines.push(Line::from(Span::styled(
                error.message().to_string(),
                Style::default().fg(Color::Red),
            )));
        }

        let mut any_table = false;
        for (name, rows) in data.loaded_tables() {
            any_table = true;
            lines.push(Line::from(Span::styled(
                name.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.extend(RowTable::new(rows).render_to_lines(width));
        }

        if !any_table {
            lines.push(Line::from(Span::styled("No initial data available", dim)));
        }

        lines
    }
}

impl Widget for ReferencePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Question ");

        let lines = self.lines(area.width.saturating_sub(2) as usize);
        let max_scroll = lines.len().saturating_sub(1);
        let scroll = self.scroll.min(max_scroll) as u16;

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
