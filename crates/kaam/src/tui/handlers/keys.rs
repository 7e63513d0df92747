use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use kaam_core::Priority;

use kaam_app::TaskStore;

use super::super::view::{Ui, UiAction};

impl<S: TaskStore + Send + 'static> Ui<S> {
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if is_quit(&key) {
            self.should_quit = true;
            return None;
        }
        if self.boundary.has_fault() {
            if key.code == KeyCode::Char('r') {
                self.reset();
            }
            return None;
        }
        self.handle_task_list_key(key)
    }

    fn handle_task_list_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.app.select_prev(),
            KeyCode::Char(' ' | 'x') => {
                if !self.app.toggle_selected() {
                    self.error("No task selected");
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if !self.app.delete_selected() {
                    self.error("No task selected");
                }
            }
            KeyCode::Char('C') => {
                // Hidden while the list is empty.
                let _ = self.app.clear_completed();
            }
            KeyCode::Char('e') => return self.begin_edit_selected(),
            KeyCode::Char('i' | 'a') => return Some(UiAction::EditForm),
            KeyCode::Char('p') => self.cycle_draft_priority(),
            KeyCode::Enter => self.app.submit(),
            KeyCode::Esc => {
                let was_editing = self.app.service().edit_session().is_editing();
                self.app.service().cancel_edit();
                if was_editing {
                    self.info("Edit cancelled");
                }
            }
            KeyCode::Char('f') => {
                let filter = self.app.cycle_filter();
                self.info(format!("Filter: {filter}"));
            }
            KeyCode::Char('s') => {
                let sort = self.app.cycle_sort();
                self.info(format!("Sort: {sort}"));
            }
            _ => {}
        }
        None
    }

    fn begin_edit_selected(&mut self) -> Option<UiAction> {
        match self.app.begin_edit_selected() {
            Ok(Some(id)) => {
                self.info(format!("Editing {}", id.short()));
                Some(UiAction::EditForm)
            }
            Ok(None) => {
                self.error("No task selected");
                None
            }
            Err(err) => {
                self.error(err.to_string());
                None
            }
        }
    }

    fn cycle_draft_priority(&mut self) {
        let mut service = self.app.service();
        let session = service.edit_session_mut();
        let next = Priority::cycle(session.draft().priority);
        session.set_priority(next);
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
