//! Supervisory boundary that turns a panic while drawing into a fallback screen.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::error;

use super::constants::FAULT_HEADLINE;

thread_local! {
    static GUARDING: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is inside [`ErrorBoundary::render`].
pub(super) fn is_guarding() -> bool {
    GUARDING.with(Cell::get)
}

/// Remembers the first render fault until the user resets.
#[derive(Debug, Default)]
pub(super) struct ErrorBoundary {
    fault: Option<String>,
}

impl ErrorBoundary {
    pub(super) const fn has_fault(&self) -> bool {
        self.fault.is_some()
    }

    pub(super) fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Run `draw`, or the fallback screen once a fault was caught.
    pub(super) fn render(&mut self, f: &mut Frame<'_>, draw: impl FnOnce(&mut Frame<'_>)) {
        if self.fault.is_none() {
            GUARDING.with(|guarding| guarding.set(true));
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| draw(f)));
            GUARDING.with(|guarding| guarding.set(false));
            match outcome {
                Ok(()) => return,
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    error!(%reason, "Render fault; showing fallback screen");
                    self.fault = Some(reason);
                }
            }
        }
        self.draw_fallback(f);
    }

    /// Forget the fault. Returns whether there was one.
    pub(super) fn reset(&mut self) -> bool {
        self.fault.take().is_some()
    }

    fn draw_fallback(&self, f: &mut Frame<'_>) {
        let area = f.area();
        let mut lines = vec![
            Line::from(Span::styled(
                FAULT_HEADLINE,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("Press r to reset, q to quit."),
        ];
        if let Some(reason) = self.fault() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                reason,
                Style::default().fg(Color::DarkGray),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_owned()
    }
}
