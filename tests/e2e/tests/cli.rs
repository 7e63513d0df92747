#![allow(missing_docs)]

use anyhow::{Result, anyhow};
use kaam_e2e::{KaamHarness, texts};
use serde_json::Value;

fn field<'a>(task: &'a Value, name: &str) -> Result<&'a Value> {
    task.get(name).ok_or_else(|| anyhow!("task missing {name}: {task}"))
}

#[test]
fn add_toggle_filter_and_clear_flow() -> Result<()> {
    let kaam = KaamHarness::new()?;

    let added = kaam.run_ok(&["add", "--text", "Buy milk", "--priority", "High"])?;
    assert!(added.starts_with("Added task "), "unexpected output: {added}");

    let tasks = kaam.list(&[])?;
    assert_eq!(texts(&tasks), vec!["Buy milk"]);
    assert_eq!(field(&tasks[0], "completed")?, &Value::Bool(false));
    assert_eq!(field(&tasks[0], "priority")?, "High");
    assert!(tasks[0].get("dueDate").is_none());

    let toggled = kaam.run_ok(&["toggle", "0"])?;
    assert!(toggled.starts_with("Completed "), "unexpected output: {toggled}");

    assert!(kaam.list(&["--filter", "Active"])?.is_empty());
    assert_eq!(kaam.list(&["--filter", "Completed"])?.len(), 1);

    let cleared = kaam.run_ok(&["clear-completed"])?;
    assert_eq!(cleared.trim(), "Cleared 1 completed task");
    assert!(kaam.list(&[])?.is_empty());
    Ok(())
}

#[test]
fn displayed_index_follows_sort_order() -> Result<()> {
    let kaam = KaamHarness::new()?;
    kaam.run_ok(&["add", "--text", "walk dog", "--priority", "Low"])?;
    kaam.run_ok(&["add", "--text", "Answer mail", "--priority", "High"])?;

    let sorted = kaam.list(&["--sort", "Task Name"])?;
    assert_eq!(texts(&sorted), vec!["Answer mail", "walk dog"]);

    let removed = kaam.run_ok(&["rm", "#0", "--sort", "Task Name"])?;
    assert!(removed.contains("Answer mail"), "unexpected output: {removed}");
    assert_eq!(texts(&kaam.list(&[])?), vec!["walk dog"]);
    Ok(())
}

#[test]
fn edit_by_id_updates_fields() -> Result<()> {
    let kaam = KaamHarness::new()?;
    kaam.run_ok(&["add", "--text", "Pay rent", "--priority", "Medium", "--due", "2999-01-31"])?;
    let tasks = kaam.list(&[])?;
    assert_eq!(field(&tasks[0], "dueDate")?, "2999-01-31");
    let id = field(&tasks[0], "id")?
        .as_str()
        .ok_or_else(|| anyhow!("id is not a string"))?
        .to_owned();

    let updated = kaam.run_ok(&["edit", &id, "--text", "Pay rent early", "--clear-due"])?;
    assert!(updated.starts_with("Updated "), "unexpected output: {updated}");

    let tasks = kaam.list(&[])?;
    assert_eq!(texts(&tasks), vec!["Pay rent early"]);
    assert_eq!(field(&tasks[0], "priority")?, "Medium");
    assert!(tasks[0].get("dueDate").is_none());

    let unchanged = kaam.run_ok(&["edit", &id, "--priority", "Medium"])?;
    assert_eq!(unchanged.trim(), "No changes");
    Ok(())
}

#[test]
fn invalid_input_exits_with_error() -> Result<()> {
    let kaam = KaamHarness::new()?;

    let blank = kaam.run(&["add", "--text", "   ", "--priority", "Low"])?;
    assert!(!blank.status.success());

    let past = kaam.run(&["add", "--text", "Late", "--priority", "Low", "--due", "2000-01-01"])?;
    assert!(!past.status.success());

    let missing = kaam.run(&["toggle", "3"])?;
    assert!(!missing.status.success());

    assert!(kaam.list(&[])?.is_empty());
    Ok(())
}

#[test]
fn tasks_persist_under_data_dir() -> Result<()> {
    let kaam = KaamHarness::new()?;
    kaam.run_ok(&["add", "--text", "Water plants", "--priority", "Low"])?;

    let blob = std::fs::read_to_string(kaam.data_dir().join("tasks.json"))?;
    let stored: Value = serde_json::from_str(&blob)?;
    assert_eq!(texts(stored.as_array().map_or(&[][..], Vec::as_slice)), vec!["Water plants"]);

    let table = kaam.run_ok(&["ls"])?;
    assert!(table.contains("Water plants"));
    Ok(())
}
