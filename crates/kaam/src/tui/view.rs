use std::mem;
use std::time::{Duration, Instant};

use kaam_app::{MutationError, TaskStore};
use kaam_core::SubmitOutcome;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
};

use super::app::{App, MutationReport};
use super::boundary::ErrorBoundary;
use super::constants::{FORM_PANE_HEIGHT, INDICATOR_BAR_HEIGHT, STATUS_FOOTER_HEIGHT, UI_MESSAGE_TTL_SECS};

pub(super) struct Ui<S> {
    pub(super) app: App<S>,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
    pub(super) boundary: ErrorBoundary,
}

impl<S: TaskStore + Send + 'static> Ui<S> {
    pub(super) const MAIN_MIN_HEIGHT: u16 = 5;

    pub(super) fn new(app: App<S>) -> Self {
        Self {
            app,
            message: None,
            should_quit: false,
            boundary: ErrorBoundary::default(),
        }
    }

    pub(super) fn draw(&mut self, f: &mut Frame<'_>) {
        let mut boundary = mem::take(&mut self.boundary);
        boundary.render(f, |f| self.draw_screen(f));
        self.boundary = boundary;
    }

    fn draw_screen(&self, f: &mut Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(Self::screen_constraints())
            .split(f.area());

        self.draw_indicators(f, rows[0]);
        self.draw_task_list(f, rows[1]);
        self.draw_form(f, rows[2]);
        self.draw_status(f, rows[3]);
    }

    pub(super) const fn screen_constraints() -> [Constraint; 4] {
        [
            Constraint::Length(INDICATOR_BAR_HEIGHT),
            Constraint::Min(Self::MAIN_MIN_HEIGHT),
            Constraint::Length(FORM_PANE_HEIGHT),
            Constraint::Length(STATUS_FOOTER_HEIGHT),
        ]
    }

    /// Discard the fault screen and any unsaved edit.
    pub(super) fn reset(&mut self) {
        if self.boundary.reset() {
            self.app.service().cancel_edit();
            self.app.clamp_selection();
            self.info("Reset");
        }
    }

    pub(super) fn poll_reports(&mut self) {
        while let Some(report) = self.app.try_next_report() {
            self.apply_report(report);
        }
    }

    pub(super) fn apply_report(&mut self, report: MutationReport) {
        match report {
            MutationReport::Submitted(Ok(SubmitOutcome::Created(_))) => self.info("Task added"),
            MutationReport::Submitted(Ok(SubmitOutcome::Saved { changed: true, .. })) => {
                self.info("Task saved");
            }
            MutationReport::Submitted(Ok(SubmitOutcome::Saved { changed: false, .. })) => {
                self.info("No changes");
            }
            MutationReport::Submitted(Ok(SubmitOutcome::Rejected)) => {}
            MutationReport::Toggled(Ok(true)) => self.info("Task completed"),
            MutationReport::Toggled(Ok(false)) => self.info("Task reopened"),
            MutationReport::Deleted(Ok(task)) => self.info(format!("Deleted: {}", task.text)),
            MutationReport::Cleared(Ok(removed)) => {
                let noun = if removed == 1 { "task" } else { "tasks" };
                self.info(format!("Cleared {removed} completed {noun}"));
            }
            MutationReport::Submitted(Err(err))
            | MutationReport::Toggled(Err(err))
            | MutationReport::Deleted(Err(err))
            | MutationReport::Cleared(Err(err)) => self.mutation_failed(&err),
        }
        self.app.clamp_selection();
    }

    fn mutation_failed(&mut self, err: &MutationError) {
        match err {
            MutationError::Busy => self.error("Still working on the previous change"),
            MutationError::Collection(inner) => self.error(inner.to_string()),
        }
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    pub(super) fn tick(&mut self) {
        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
    }
}

pub(super) fn split_area(area: Rect, constraints: [Constraint; 2]) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);
    [chunks[0], chunks[1]]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UiAction {
    /// Open the form fields in `$EDITOR`.
    EditForm,
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
            created_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
