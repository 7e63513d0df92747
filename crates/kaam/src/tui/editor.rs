use kaam_core::{DueDateError, EditMode, EditSession, Priority, TaskDraft, format_date, parse_due_input};
use time::Date;

pub(super) fn form_editor_template(session: &EditSession) -> String {
    let draft = session.draft();
    let header = match session.mode() {
        EditMode::Idle => "# Add Task: fill in the fields below.".to_owned(),
        EditMode::Editing(id) => format!("# Save Task: editing {}.", id.short()),
    };
    let priority = draft.priority.map_or("", Priority::as_str);
    let due = draft.due_date.map(format_date).unwrap_or_default();

    let lines = vec![
        header,
        "# Lines starting with '#' are ignored. Text and priority are required.".to_owned(),
        "# priority: Low, Medium or High. due: YYYY-MM-DD, today or later, or blank.".to_owned(),
        format!("text: {}", draft.text),
        format!("priority: {priority}"),
        format!("due: {due}"),
        String::new(),
    ];
    lines.join("\n")
}

/// Read the form fields back from the editor buffer.
///
/// A due date before `min_due` is rejected unless it equals `current_due`,
/// so an overdue task can be edited without losing its date.
pub(super) fn parse_form_editor_output(
    raw: &str,
    min_due: Date,
    current_due: Option<Date>,
) -> Result<TaskDraft, String> {
    let mut text: Option<&str> = None;
    let mut priority: Option<&str> = None;
    let mut due: Option<&str> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(format!("Malformed line: {trimmed}"));
        };
        match key.trim() {
            // Only the separator space goes; the text itself is kept as typed.
            "text" => text = Some(value.strip_prefix(' ').unwrap_or(value)),
            "priority" => priority = Some(value.trim()),
            "due" => due = Some(value.trim()),
            unknown => return Err(format!("Unknown field: {unknown}")),
        }
    }

    let priority = match priority.unwrap_or("") {
        "" => None,
        value => Some(value.parse::<Priority>().map_err(|err| err.to_string())?),
    };
    let due_date = match parse_due_input(due.unwrap_or(""), min_due) {
        Err(DueDateError::BeforeMinimum { date, .. }) if Some(date) == current_due => Some(date),
        other => other.map_err(|err| err.to_string())?,
    };
    Ok(TaskDraft::new(text.unwrap_or(""), priority, due_date))
}
