#![allow(missing_docs)]

use std::fs;
use std::time::Duration;

use kaam_app::{AsyncTaskService, BlobTaskStore, TaskRef, TaskService, ViewConfig};
use kaam_core::{Filter, Priority, SubmitOutcome, TaskDraft};
use kaam_store::FileBlobStore;
use tempfile::TempDir;

fn open(dir: &TempDir) -> TaskService<BlobTaskStore<FileBlobStore>> {
    let blobs = FileBlobStore::open(dir.path()).unwrap_or_else(|err| panic!("open store: {err}"));
    TaskService::open(BlobTaskStore::new(blobs, "tasks"), ViewConfig::default())
}

#[test]
fn test_tasks_survive_restart() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    {
        let mut service = open(&dir);
        service.add_task(&TaskDraft::new("Buy milk", Some(Priority::High), None));
        service.add_task(&TaskDraft::new("Walk dog", Some(Priority::Low), None));
        service
            .toggle_completion(TaskRef::Displayed(1))
            .unwrap_or_else(|err| panic!("toggle: {err}"));
    }
    let service = open(&dir);
    let tasks = service.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].text, "Buy milk");
    assert!(!tasks[0].completed);
    assert!(tasks[1].completed);
}

#[test]
fn test_ids_are_stable_across_restart() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let id = open(&dir)
        .add_task(&TaskDraft::new("Buy milk", Some(Priority::High), None))
        .unwrap_or_else(|| panic!("add"));
    let service = open(&dir);
    assert_eq!(service.resolve(TaskRef::Id(id)).ok(), Some(id));
}

#[test]
fn test_legacy_blob_without_ids_is_upgraded_on_save() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[{"text":"Old","completed":true,"priority":"Medium","dueDate":""}]"#,
    )
    .unwrap_or_else(|err| panic!("write: {err}"));

    let mut service = open(&dir);
    service.set_filter(Filter::Completed);
    assert_eq!(service.view().len(), 1);
    service.add_task(&TaskDraft::new("New", Some(Priority::Low), None));

    let raw = fs::read_to_string(&path).unwrap_or_else(|err| panic!("read: {err}"));
    assert!(raw.contains(r#""id":"#));
    assert!(!raw.contains("dueDate"));
}

#[test]
fn test_corrupt_blob_is_replaced_by_next_save() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let path = dir.path().join("tasks.json");
    fs::write(&path, "not json at all").unwrap_or_else(|err| panic!("write: {err}"));

    let mut service = open(&dir);
    assert!(!service.has_tasks());
    service.add_task(&TaskDraft::new("Fresh", Some(Priority::High), None));
    drop(service);

    assert_eq!(open(&dir).tasks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_async_submit_persists_to_disk() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let service = AsyncTaskService::new(open(&dir), Duration::from_millis(500));
    {
        let mut guard = service.lock().await;
        guard.edit_session_mut().set_text("Buy milk");
        guard.edit_session_mut().set_priority(Some(Priority::High));
    }
    let outcome = service.submit().await.unwrap_or_else(|err| panic!("submit: {err}"));
    assert!(matches!(outcome, SubmitOutcome::Created(_)));
    drop(service);

    let reopened = open(&dir);
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.tasks()[0].priority, Priority::High);
}
