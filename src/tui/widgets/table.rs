//! Row table widget for the TUI.
//!
//! Renders a list of rows as a box-drawn table with column headers,
//! auto-sized columns, and styled NULL values. Columns are taken from the
//! first row, the way the browser UI keyed its header row.

use crate::db::{Row, Value};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Widget for rendering rows as a table.
pub struct RowTable<'a> {
    rows: &'a [Row],
}

impl<'a> RowTable<'a> {
    /// Creates a new row table widget.
    pub fn new(rows: &'a [Row]) -> Self {
        Self { rows }
    }

    fn columns(&self) -> Vec<&'a str> {
        self.rows
            .first()
            .map(|row| row.columns().collect())
            .unwrap_or_default()
    }

    fn cell(row: &Row, column: &str) -> Value {
        row.get(column).cloned().unwrap_or(Value::Null)
    }

    /// Calculates the optimal width for each column.
    fn calculate_column_widths(&self, columns: &[&str]) -> Vec<usize> {
        let mut widths: Vec<usize> = columns
            .iter()
            .map(|name| name.chars().count().max(MIN_COLUMN_WIDTH))
            .collect();

        for row in self.rows {
            for (i, column) in columns.iter().enumerate() {
                let len = Self::cell(row, column).to_display_string().chars().count();
                widths[i] = widths[i].max(len);
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let kept: String = s.chars().take(max_width - 3).collect();
            format!("{kept}...")
        }
    }

    /// Renders the table to lines for embedding in other widgets.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let columns = self.columns();

        if columns.is_empty() {
            return vec![Line::from(Span::styled(
                "(no rows)",
                Style::default().fg(Color::DarkGray),
            ))];
        }

        let widths = self.calculate_column_widths(&columns);

        // Borders and padding take three cells per column plus one.
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };

        let adjusted_widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(Self::render_border(&adjusted_widths, '┌', '┬', '┐'));
        lines.push(Self::render_header_row(&columns, &adjusted_widths));
        lines.push(Self::render_border(&adjusted_widths, '├', '┼', '┤'));
        for row in self.rows {
            lines.push(Self::render_data_row(row, &columns, &adjusted_widths));
        }
        lines.push(Self::render_border(&adjusted_widths, '└', '┴', '┘'));

        lines
    }

    /// Renders a horizontal border line.
    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
        let mut border = String::new();
        border.push(left);

        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                border.push(mid);
            }
        }

        border.push(right);

        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    /// Renders the header row with column names.
    fn render_header_row(columns: &[&str], widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (name, &width) in columns.iter().zip(widths) {
            let padded = format!(" {:width$} ", Self::truncate(name, width), width = width);
            spans.push(Span::styled(
                padded,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }

    /// Renders a data row.
    fn render_data_row(row: &Row, columns: &[&str], widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (column, &width) in columns.iter().zip(widths) {
            let value = Self::cell(row, column);
            let display = Self::truncate(&value.to_display_string(), width);
            let padded = format!(" {:width$} ", display, width = width);

            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(padded, style));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }
}

impl Widget for RowTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize);

        for (i, line) in lines.iter().take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}
