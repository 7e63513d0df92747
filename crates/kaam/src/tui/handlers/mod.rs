use anyhow::Result;

use kaam_app::TaskStore;

use super::terminal::CrosstermTerminal;
use super::view::{Ui, UiAction};

pub(super) mod edit;
pub(super) mod keys;

pub(super) fn handle_ui_action<S: TaskStore + Send + 'static>(
    terminal: &mut CrosstermTerminal,
    ui: &mut Ui<S>,
    action: UiAction,
) -> Result<()> {
    edit::handle_ui_action(terminal, ui, action)
}
