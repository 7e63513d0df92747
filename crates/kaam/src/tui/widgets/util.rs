use std::borrow::Cow;

use kaam_core::{DueStatus, Priority};
use ratatui::style::{Color, Style};
use unicode_segmentation::UnicodeSegmentation;

pub(super) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let graphemes = UnicodeSegmentation::graphemes(input, true);
    if graphemes.clone().nth(max_graphemes).is_none() {
        return Cow::Borrowed(input);
    }

    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        return Cow::Owned(graphemes.take(max_graphemes).collect());
    }

    let mut truncated: String = graphemes.take(max_graphemes - ELLIPSIS_GRAPHEMES).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

pub(super) const fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub(super) fn due_style(status: DueStatus) -> Style {
    match status {
        DueStatus::Overdue => Style::default().fg(Color::Red),
        DueStatus::DueToday => Style::default().fg(Color::Yellow),
        DueStatus::Upcoming => Style::default().fg(Color::Green),
    }
}

pub(super) const fn due_suffix(status: DueStatus) -> &'static str {
    match status {
        DueStatus::Overdue => " (overdue)",
        DueStatus::DueToday => " (today)",
        DueStatus::Upcoming => "",
    }
}
