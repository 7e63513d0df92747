use anyhow::Result;
use kaam_core::today;

use kaam_app::TaskStore;

use super::super::editor::{form_editor_template, parse_form_editor_output};
use super::super::terminal::{CrosstermTerminal, launch_editor, with_terminal_suspended};
use super::super::view::{Ui, UiAction};

pub(super) fn handle_ui_action<S: TaskStore + Send + 'static>(
    terminal: &mut CrosstermTerminal,
    ui: &mut Ui<S>,
    action: UiAction,
) -> Result<()> {
    match action {
        UiAction::EditForm => {
            let template = form_editor_template(ui.app.service().edit_session());
            let raw = with_terminal_suspended(terminal, || launch_editor(&template))?;
            ui.apply_form_input(&raw);
        }
    }
    Ok(())
}

impl<S: TaskStore + Send + 'static> Ui<S> {
    /// Stage the fields read back from the editor buffer.
    pub(in crate::tui) fn apply_form_input(&mut self, raw: &str) {
        let staged = {
            let mut service = self.app.service();
            let current_due = service
                .edit_session()
                .target()
                .and_then(|id| service.state().collection.get(id))
                .and_then(|task| task.due_date);
            parse_form_editor_output(raw, today(), current_due).map(|draft| {
                let session = service.edit_session_mut();
                if *session.draft() == draft {
                    None
                } else {
                    session.set_draft(draft);
                    Some(session.primary_label())
                }
            })
        };
        match staged {
            Ok(Some(label)) => self.info(format!("Form updated; press Enter to {}", label.to_lowercase())),
            Ok(None) => self.info("Form unchanged"),
            Err(message) => self.error(message),
        }
    }
}
