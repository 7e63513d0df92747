use kaam_core::{Task, format_date, today};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use time::Date;

use kaam_app::TaskStore;

use super::super::constants::{LOADING_TEXT, TASK_LIST_HIGHLIGHT_SYMBOL};
use super::super::view::Ui;
use super::util::{due_style, due_suffix, priority_color};

impl<S: TaskStore + Send + 'static> Ui<S> {
    pub(in crate::tui) fn draw_task_list(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title("Tasks").borders(Borders::ALL);

        if self.app.is_loading() {
            let loading = Paragraph::new(LOADING_TEXT)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(loading, area);
            return;
        }

        let service = self.app.service();
        let view = service.view();
        let items: Vec<ListItem<'_>> = if view.is_empty() {
            let message = if service.has_tasks() {
                "No tasks match the filter"
            } else {
                "No tasks yet"
            };
            vec![ListItem::new(Line::from(message))]
        } else {
            let today = today();
            view.iter().map(|task| task_row(task, today)).collect()
        };

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(TASK_LIST_HIGHLIGHT_SYMBOL);
        let mut state = ListState::default();
        if !view.is_empty() {
            state.select(Some(self.app.selected_index()));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}

fn task_row(task: &Task, today: Date) -> ListItem<'static> {
    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let text_style = if task.completed {
        Style::default()
            .add_modifier(Modifier::CROSSED_OUT)
            .fg(Color::DarkGray)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![
        Span::raw(checkbox),
        Span::styled(task.text.clone(), text_style),
        Span::raw("  "),
        Span::styled(
            task.priority.as_str(),
            Style::default().fg(priority_color(task.priority)),
        ),
    ];
    if let (Some(due), Some(status)) = (task.due_date, task.due_status(today)) {
        let suffix = if task.completed { "" } else { due_suffix(status) };
        let style = if task.completed {
            Style::default().fg(Color::DarkGray)
        } else {
            due_style(status)
        };
        spans.push(Span::styled(format!("  due {}{suffix}", format_date(due)), style));
    }
    ListItem::new(Line::from(spans))
}
