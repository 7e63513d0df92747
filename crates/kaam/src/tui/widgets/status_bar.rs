use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use kaam_app::TaskStore;

use super::super::view::{Message, Ui, split_area};

impl<S: TaskStore + Send + 'static> Ui<S> {
    pub(in crate::tui) fn draw_indicators(&self, f: &mut Frame<'_>, area: Rect) {
        let (filter, sort) = {
            let service = self.app.service();
            (service.filter(), service.sort())
        };
        let block = Block::default().title("kaam").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let [left, right] = split_area(inner, [Constraint::Percentage(50), Constraint::Percentage(50)]);
        let key = Style::default().fg(Color::DarkGray);
        let value = Style::default().add_modifier(Modifier::BOLD);
        let filter_line = Line::from(vec![
            Span::styled("Filter: ", key),
            Span::styled(filter.label(), value),
        ]);
        let sort_line = Line::from(vec![Span::styled("Sort: ", key), Span::styled(sort.label(), value)]);
        f.render_widget(Paragraph::new(filter_line), left);
        f.render_widget(Paragraph::new(sort_line).alignment(Alignment::Right), right);
    }

    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(self.instructions()),
            Line::from(Span::styled(self.status_text(), self.status_style())),
        ];
        let status = Paragraph::new(lines)
            .block(Block::default().title("Keys").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(status, area);
    }

    /// Key hints; clear completed is only offered while there are tasks.
    pub(in crate::tui) fn instructions(&self) -> String {
        let mut hints = vec![
            "j/k: move",
            "space: toggle",
            "d: delete",
            "e: edit",
            "i: form",
            "p: priority",
            "enter: submit",
            "esc: cancel",
            "f: filter",
            "s: sort",
        ];
        if self.app.service().has_tasks() {
            hints.push("C: clear completed");
        }
        hints.push("q: quit");
        hints.join("  ")
    }

    fn status_text(&self) -> Cow<'_, str> {
        self.message
            .as_ref()
            .map_or(Cow::Borrowed(""), |msg| Cow::Borrowed(msg.text.as_str()))
    }

    fn status_style(&self) -> Style {
        self.message.as_ref().map_or_else(Style::default, Message::style)
    }
}
