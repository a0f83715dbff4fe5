//! Test case verdict list.

use crate::sandbox::TestCase;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// One line per test case with its verdict.
pub struct TestCasesPanel<'a> {
    cases: &'a [TestCase],
}

impl<'a> TestCasesPanel<'a> {
    pub fn new(cases: &'a [TestCase]) -> Self {
        Self { cases }
    }
}

impl Widget for TestCasesPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let passed = self.cases.iter().filter(|c| c.passed).count();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Test Cases ({}/{}) ", passed, self.cases.len()));

        let lines: Vec<Line> = if self.cases.is_empty() {
            vec![Line::from(Span::styled(
                "Loading test cases...",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.cases
                .iter()
                .map(|case| {
                    let color = if case.passed { Color::Green } else { Color::Red };
                    Line::from(vec![
                        Span::raw(format!("Testcase {}  ", case.id)),
                        Span::styled(
                            case.status_label(),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                    ])
                })
                .collect()
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
