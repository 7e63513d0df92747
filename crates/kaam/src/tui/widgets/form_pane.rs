use kaam_core::{Priority, format_date};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use kaam_app::TaskStore;

use super::super::constants::FORM_TEXT_MAX_GRAPHEMES;
use super::super::view::Ui;
use super::util::{priority_color, truncate_with_ellipsis};

impl<S: TaskStore + Send + 'static> Ui<S> {
    /// Staged draft under the label of the primary action.
    pub(in crate::tui) fn draw_form(&self, f: &mut Frame<'_>, area: Rect) {
        let service = self.app.service();
        let session = service.edit_session();
        let draft = session.draft();

        let label = Style::default().fg(Color::DarkGray);
        let placeholder = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);

        let text = if draft.text.trim().is_empty() {
            Span::styled("(enter text)", placeholder)
        } else {
            Span::raw(truncate_with_ellipsis(&draft.text, FORM_TEXT_MAX_GRAPHEMES).into_owned())
        };
        let priority = draft.priority.map_or_else(
            || Span::styled("(choose priority)", placeholder),
            |priority: Priority| Span::styled(priority.as_str(), Style::default().fg(priority_color(priority))),
        );
        let due = draft.due_date.map_or_else(
            || Span::styled("(none)", placeholder),
            |date| Span::raw(format_date(date)),
        );

        let lines = vec![
            Line::from(vec![Span::styled("Text:     ", label), text]),
            Line::from(vec![Span::styled("Priority: ", label), priority]),
            Line::from(vec![Span::styled("Due:      ", label), due]),
        ];

        let title = session.target().map_or_else(
            || session.primary_label().to_owned(),
            |id| format!("{} ({})", session.primary_label(), id.short()),
        );
        let title_style = if session.can_submit() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let form = Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(title, title_style))
                .borders(Borders::ALL),
        );
        f.render_widget(form, area);
    }
}
