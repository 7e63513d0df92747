use std::io::{self, Write};

use anyhow::{Context, Result, anyhow, bail};
use kaam_app::{TaskRef, TaskService, TaskStore};
use kaam_core::{DueStatus, Priority, Task, TaskDraft, format_date, parse_due_input, today};

use crate::{Command, ViewArgs};

/// Execute a non-interactive command against `service`.
///
/// # Errors
/// Returns an error when arguments are invalid or the referenced task is missing.
pub fn run<S: TaskStore>(command: Command, service: &mut TaskService<S>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(command, service, &mut out)
}

fn run_with_output<S: TaskStore>(
    command: Command,
    service: &mut TaskService<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Add { text, priority, due } => handle_add(service, out, text, priority, due.as_deref()),
        Command::Ls { view, json } => {
            apply_view(service, view);
            handle_ls(service, out, json)
        }
        Command::Toggle { selector, view } => {
            apply_view(service, view);
            handle_toggle(service, out, selector)
        }
        Command::Rm { selector, view } => {
            apply_view(service, view);
            handle_rm(service, out, selector)
        }
        Command::Edit {
            selector,
            view,
            text,
            priority,
            due,
            clear_due,
        } => {
            apply_view(service, view);
            let changes = EditArgs {
                text,
                priority,
                due,
                clear_due,
            };
            handle_edit(service, out, selector, changes)
        }
        Command::ClearCompleted => handle_clear_completed(service, out),
        Command::Tui => Err(anyhow!("the TUI is not a batch command")),
    }
}

fn apply_view<S: TaskStore>(service: &mut TaskService<S>, view: ViewArgs) {
    if let Some(filter) = view.filter {
        service.set_filter(filter);
    }
    if let Some(sort) = view.sort {
        service.set_sort(sort);
    }
}

fn handle_add<S: TaskStore>(
    service: &mut TaskService<S>,
    out: &mut impl Write,
    text: String,
    priority: Priority,
    due: Option<&str>,
) -> Result<()> {
    let due_date = parse_due(due)?;
    let draft = TaskDraft::new(text, Some(priority), due_date);
    let Some(id) = service.add_task(&draft) else {
        bail!("task text must not be empty");
    };
    writeln!(out, "Added task {id}")?;
    Ok(())
}

fn handle_ls<S: TaskStore>(service: &TaskService<S>, out: &mut impl Write, json: bool) -> Result<()> {
    let tasks = service.view();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?;
        return Ok(());
    }
    if tasks.is_empty() {
        if service.has_tasks() {
            writeln!(out, "No tasks matched the filter")?;
        } else {
            writeln!(out, "No tasks found")?;
        }
        return Ok(());
    }
    render_task_table(out, &tasks)
}

fn handle_toggle<S: TaskStore>(
    service: &mut TaskService<S>,
    out: &mut impl Write,
    selector: TaskRef,
) -> Result<()> {
    let id = service
        .resolve(selector)
        .with_context(|| format!("cannot toggle {selector}"))?;
    let completed = service.toggle_completion(TaskRef::Id(id))?;
    let verb = if completed { "Completed" } else { "Reopened" };
    let text = service
        .tasks()
        .iter()
        .find(|task| task.id == id)
        .map_or("", |task| task.text.as_str());
    writeln!(out, "{verb} {}: {text}", id.short())?;
    Ok(())
}

fn handle_rm<S: TaskStore>(service: &mut TaskService<S>, out: &mut impl Write, selector: TaskRef) -> Result<()> {
    let removed = service
        .delete_task(selector)
        .with_context(|| format!("cannot delete {selector}"))?;
    writeln!(out, "Deleted {}: {}", removed.id.short(), removed.text)?;
    Ok(())
}

struct EditArgs {
    text: Option<String>,
    priority: Option<Priority>,
    due: Option<String>,
    clear_due: bool,
}

fn handle_edit<S: TaskStore>(
    service: &mut TaskService<S>,
    out: &mut impl Write,
    selector: TaskRef,
    changes: EditArgs,
) -> Result<()> {
    let id = service
        .resolve(selector)
        .with_context(|| format!("cannot edit {selector}"))?;
    let current = service
        .tasks()
        .iter()
        .find(|task| task.id == id)
        .ok_or_else(|| anyhow!("task {id} disappeared"))?;

    let mut draft = TaskDraft::from_task(current);
    if let Some(text) = changes.text {
        draft.text = text;
    }
    if let Some(priority) = changes.priority {
        draft.priority = Some(priority);
    }
    if changes.clear_due {
        draft.due_date = None;
    } else if let Some(due) = changes.due.as_deref() {
        draft.due_date = parse_due(Some(due))?;
    }
    if !draft.is_ready() {
        bail!("task text must not be empty");
    }

    let changed = service.edit_task(TaskRef::Id(id), &draft)?;
    if changed {
        writeln!(out, "Updated {}", id.short())?;
    } else {
        writeln!(out, "No changes")?;
    }
    Ok(())
}

fn handle_clear_completed<S: TaskStore>(service: &mut TaskService<S>, out: &mut impl Write) -> Result<()> {
    let removed = service.clear_completed();
    let noun = if removed == 1 { "task" } else { "tasks" };
    writeln!(out, "Cleared {removed} completed {noun}")?;
    Ok(())
}

fn parse_due(raw: Option<&str>) -> Result<Option<time::Date>> {
    match raw {
        Some(raw) => Ok(parse_due_input(raw, today())?),
        None => Ok(None),
    }
}

fn render_task_table(out: &mut impl Write, tasks: &[&Task]) -> Result<()> {
    let today = today();
    writeln!(out, "# | ID | Done | Priority | Due | Task")?;
    writeln!(out, "- | -- | ---- | -------- | --- | ----")?;

    for (index, task) in tasks.iter().enumerate() {
        let done = if task.completed { "x" } else { " " };
        let due = task.due_date.map_or_else(
            || "-".to_owned(),
            |date| {
                let label = format_date(date);
                match DueStatus::classify(date, today) {
                    DueStatus::Overdue if !task.completed => format!("{label} (overdue)"),
                    DueStatus::DueToday if !task.completed => format!("{label} (today)"),
                    _ => label,
                }
            },
        );
        writeln!(
            out,
            "{index} | {} | [{done}] | {} | {due} | {}",
            task.id.short(),
            task.priority,
            task.text
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaam_app::{BlobTaskStore, ViewConfig};
    use kaam_core::{Filter, SortOption};
    use kaam_store::MemoryBlobStore;

    type Service = TaskService<BlobTaskStore<MemoryBlobStore>>;

    fn service() -> Service {
        TaskService::open(BlobTaskStore::new(MemoryBlobStore::new(), "tasks"), ViewConfig::default())
    }

    fn run_cmd(service: &mut Service, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run_with_output(command, service, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn ok_cmd(service: &mut Service, command: Command) -> String {
        run_cmd(service, command).unwrap_or_else(|err| panic!("command failed: {err:#}"))
    }

    fn add(service: &mut Service, text: &str, priority: Priority) {
        ok_cmd(
            service,
            Command::Add {
                text: text.to_owned(),
                priority,
                due: None,
            },
        );
    }

    #[test]
    fn add_then_list() {
        let mut service = service();
        add(&mut service, "Buy milk", Priority::High);
        let listing = ok_cmd(
            &mut service,
            Command::Ls {
                view: ViewArgs::default(),
                json: false,
            },
        );
        assert!(listing.contains("Buy milk"));
        assert!(listing.contains("High"));
        assert!(listing.starts_with("# | ID"));
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut service = service();
        let result = run_cmd(
            &mut service,
            Command::Add {
                text: "   ".to_owned(),
                priority: Priority::Low,
                due: None,
            },
        );
        assert!(result.is_err());
        assert!(!service.has_tasks());
    }

    #[test]
    fn add_rejects_past_due_date() {
        let mut service = service();
        let result = run_cmd(
            &mut service,
            Command::Add {
                text: "Late".to_owned(),
                priority: Priority::Low,
                due: Some("2000-01-01".to_owned()),
            },
        );
        assert!(result.is_err());
        assert!(!service.has_tasks());
    }

    #[test]
    fn toggle_by_displayed_index_under_sort() {
        let mut service = service();
        add(&mut service, "low", Priority::Low);
        add(&mut service, "high", Priority::High);
        let output = ok_cmd(
            &mut service,
            Command::Toggle {
                selector: TaskRef::Displayed(0),
                view: ViewArgs {
                    filter: None,
                    sort: Some(SortOption::Priority),
                },
            },
        );
        assert!(output.contains("Completed"));
        assert!(output.contains("high"));
        assert!(service.tasks().iter().any(|task| task.text == "high" && task.completed));
        assert!(service.tasks().iter().any(|task| task.text == "low" && !task.completed));
    }

    #[test]
    fn rm_reports_missing_index() {
        let mut service = service();
        let result = run_cmd(
            &mut service,
            Command::Rm {
                selector: TaskRef::Displayed(4),
                view: ViewArgs::default(),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn edit_changes_only_given_fields() {
        let mut service = service();
        add(&mut service, "Walk", Priority::Low);
        let output = ok_cmd(
            &mut service,
            Command::Edit {
                selector: TaskRef::Displayed(0),
                view: ViewArgs::default(),
                text: None,
                priority: Some(Priority::High),
                due: None,
                clear_due: false,
            },
        );
        assert!(output.starts_with("Updated"));
        assert_eq!(service.tasks()[0].text, "Walk");
        assert_eq!(service.tasks()[0].priority, Priority::High);

        let unchanged = ok_cmd(
            &mut service,
            Command::Edit {
                selector: TaskRef::Displayed(0),
                view: ViewArgs::default(),
                text: Some("Walk".to_owned()),
                priority: None,
                due: None,
                clear_due: true,
            },
        );
        assert_eq!(unchanged.trim(), "No changes");
    }

    #[test]
    fn filtered_listing_and_clear_completed() {
        let mut service = service();
        add(&mut service, "done", Priority::Low);
        add(&mut service, "open", Priority::Low);
        ok_cmd(
            &mut service,
            Command::Toggle {
                selector: TaskRef::Displayed(0),
                view: ViewArgs::default(),
            },
        );

        let completed = ok_cmd(
            &mut service,
            Command::Ls {
                view: ViewArgs {
                    filter: Some(Filter::Completed),
                    sort: None,
                },
                json: true,
            },
        );
        let parsed: Vec<Task> = serde_json::from_str(&completed).unwrap_or_else(|err| panic!("json: {err}"));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text, "done");

        let cleared = ok_cmd(&mut service, Command::ClearCompleted);
        assert_eq!(cleared.trim(), "Cleared 1 completed task");

        let empty = ok_cmd(
            &mut service,
            Command::Ls {
                view: ViewArgs::default(),
                json: false,
            },
        );
        assert_eq!(empty.trim(), "No tasks matched the filter");
    }
}
