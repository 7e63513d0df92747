use std::future::Future;

use kaam_app::{AsyncTaskService, MutationError, TaskRef, TaskService, TaskStore};
use kaam_core::{CollectionError, Filter, SortOption, SubmitOutcome, Task, TaskId};
use tokio::runtime::Handle;
use tokio::sync::MutexGuard;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::debug;

/// Outcome of a mutation that ran on the runtime.
#[derive(Debug)]
pub(super) enum MutationReport {
    Submitted(Result<SubmitOutcome, MutationError>),
    Toggled(Result<bool, MutationError>),
    Deleted(Result<Task, MutationError>),
    Cleared(Result<usize, MutationError>),
}

/// Application state shared between the TUI event loop and rendering.
///
/// Mutations run as tasks on `runtime`; their results come back through a
/// channel so the event loop never waits on the simulated latency.
pub(super) struct App<S> {
    service: AsyncTaskService<S>,
    runtime: Handle,
    reports_tx: UnboundedSender<MutationReport>,
    reports_rx: UnboundedReceiver<MutationReport>,
    pending: usize,
    selected: usize,
}

impl<S: TaskStore + Send + 'static> App<S> {
    pub(super) fn new(service: AsyncTaskService<S>, runtime: Handle) -> Self {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        Self {
            service,
            runtime,
            reports_tx,
            reports_rx,
            pending: 0,
            selected: 0,
        }
    }

    /// Whether a mutation is in flight.
    pub(super) fn is_loading(&self) -> bool {
        self.service.is_loading()
    }

    /// Lock the service for reading or for synchronous edits.
    pub(super) fn service(&self) -> MutexGuard<'_, TaskService<S>> {
        self.service.blocking_lock()
    }

    pub(super) const fn selected_index(&self) -> usize {
        self.selected
    }

    pub(super) fn selected_task_id(&self) -> Option<TaskId> {
        self.service().view().get(self.selected).map(|task| task.id)
    }

    fn visible_len(&self) -> usize {
        self.service().view().len()
    }

    pub(super) fn select_next(&mut self) {
        let len = self.visible_len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub(super) const fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside the displayed sequence.
    pub(super) fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub(super) fn cycle_filter(&mut self) -> Filter {
        let next = {
            let mut service = self.service();
            let next = service.filter().next();
            service.set_filter(next);
            next
        };
        self.clamp_selection();
        next
    }

    pub(super) fn cycle_sort(&mut self) -> SortOption {
        let next = {
            let mut service = self.service();
            let next = service.sort().next();
            service.set_sort(next);
            next
        };
        self.clamp_selection();
        next
    }

    /// Load the selected task into the form. `Ok(None)` when nothing is selected.
    pub(super) fn begin_edit_selected(&self) -> Result<Option<TaskId>, CollectionError> {
        let Some(id) = self.selected_task_id() else {
            return Ok(None);
        };
        self.service().begin_edit(TaskRef::Id(id)).map(Some)
    }

    pub(super) fn submit(&mut self) {
        self.spawn(|service| async move { MutationReport::Submitted(service.submit().await) });
    }

    /// Toggle the selected task; returns false when nothing is selected.
    pub(super) fn toggle_selected(&mut self) -> bool {
        let Some(id) = self.selected_task_id() else {
            return false;
        };
        self.spawn(move |service| async move {
            MutationReport::Toggled(service.toggle_completion(TaskRef::Id(id)).await)
        });
        true
    }

    /// Delete the selected task; returns false when nothing is selected.
    pub(super) fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected_task_id() else {
            return false;
        };
        self.spawn(move |service| async move {
            MutationReport::Deleted(service.delete_task(TaskRef::Id(id)).await)
        });
        true
    }

    /// Clear completed tasks; offered only while the collection is non-empty.
    pub(super) fn clear_completed(&mut self) -> bool {
        if !self.service().has_tasks() {
            return false;
        }
        self.spawn(|service| async move { MutationReport::Cleared(service.clear_completed().await) });
        true
    }

    pub(super) fn try_next_report(&mut self) -> Option<MutationReport> {
        match self.reports_rx.try_recv() {
            Ok(report) => {
                self.pending = self.pending.saturating_sub(1);
                Some(report)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until every spawned mutation has reported back.
    pub(super) fn finish_pending(&mut self) -> Vec<MutationReport> {
        let mut reports = Vec::new();
        while self.pending > 0 {
            let Some(report) = self.reports_rx.blocking_recv() else {
                break;
            };
            self.pending -= 1;
            reports.push(report);
        }
        reports
    }

    #[cfg(test)]
    pub(super) fn wait_for_report(&mut self) -> Option<MutationReport> {
        if self.pending == 0 {
            return None;
        }
        let report = self.reports_rx.blocking_recv()?;
        self.pending -= 1;
        Some(report)
    }

    fn spawn<F, Fut>(&mut self, job: F)
    where
        F: FnOnce(AsyncTaskService<S>) -> Fut,
        Fut: Future<Output = MutationReport> + Send + 'static,
    {
        let future = job(self.service.clone());
        let reports = self.reports_tx.clone();
        self.pending += 1;
        self.runtime.spawn(async move {
            let report = future.await;
            debug!(?report, "Mutation finished");
            let _ = reports.send(report);
        });
    }
}
