//! Async wrapper that applies the simulated mutation latency.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use kaam_core::{CollectionError, SubmitOutcome, Task, TaskDraft, TaskId};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::service::TaskService;
use crate::state::TaskRef;
use crate::task_store::TaskStore;

/// Errors raised by [`AsyncTaskService`] mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Another mutation is still in flight.
    #[error("another change is still in progress")]
    Busy,
    /// The collection rejected the change.
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Shared handle to a [`TaskService`] whose add and delete take `delay` to
/// complete.
///
/// At most one collection mutation runs at a time; a second one issued while
/// the first is pending fails with [`MutationError::Busy`]. The service lock
/// is never held across the delay, so reads and view changes stay available.
pub struct AsyncTaskService<S> {
    inner: Arc<Mutex<TaskService<S>>>,
    in_flight: Arc<AtomicBool>,
    delay: Duration,
}

impl<S> Clone for AsyncTaskService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            in_flight: Arc::clone(&self.in_flight),
            delay: self.delay,
        }
    }
}

struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: TaskStore> AsyncTaskService<S> {
    /// Wrap `service`, delaying add and delete by `delay`.
    pub fn new(service: TaskService<S>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
            in_flight: Arc::new(AtomicBool::new(false)),
            delay,
        }
    }

    /// Whether a mutation is pending; the list shows a loading indicator then.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Lock the service from async code.
    pub async fn lock(&self) -> MutexGuard<'_, TaskService<S>> {
        self.inner.lock().await
    }

    /// Lock the service from synchronous code outside the runtime.
    pub fn blocking_lock(&self) -> MutexGuard<'_, TaskService<S>> {
        self.inner.blocking_lock()
    }

    fn begin(&self) -> Result<InFlight, MutationError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MutationError::Busy)?;
        Ok(InFlight(Arc::clone(&self.in_flight)))
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            debug!(delay = ?self.delay, "Simulating latency");
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Append a task after the delay. Incomplete drafts return `Ok(None)`
    /// immediately without entering the loading state.
    ///
    /// # Errors
    /// Returns [`MutationError::Busy`] while another mutation is pending.
    pub async fn add_task(&self, draft: TaskDraft) -> Result<Option<TaskId>, MutationError> {
        if !draft.is_ready() {
            return Ok(None);
        }
        let _guard = self.begin()?;
        self.pause().await;
        Ok(self.inner.lock().await.add_task(&draft))
    }

    /// Primary form action. Adding is delayed and clears the form once done;
    /// saving an edit is immediate.
    ///
    /// # Errors
    /// Returns [`MutationError::Busy`] while another mutation is pending, or
    /// the collection error when the edit target vanished.
    pub async fn submit(&self) -> Result<SubmitOutcome, MutationError> {
        let _guard = self.begin()?;
        let draft = {
            let mut service = self.inner.lock().await;
            if service.edit_session().is_editing() {
                return Ok(service.submit()?);
            }
            if !service.edit_session().can_submit() {
                return Ok(SubmitOutcome::Rejected);
            }
            service.edit_session().draft().clone()
        };
        self.pause().await;
        let mut service = self.inner.lock().await;
        let Some(id) = service.add_task(&draft) else {
            return Ok(SubmitOutcome::Rejected);
        };
        if !service.edit_session().is_editing() {
            service.edit_session_mut().set_draft(TaskDraft::default());
        }
        drop(service);
        Ok(SubmitOutcome::Created(id))
    }

    /// Flip completion of the referenced task.
    ///
    /// # Errors
    /// Returns [`MutationError::Busy`] while another mutation is pending, or
    /// the collection error when the reference does not name a task.
    pub async fn toggle_completion(&self, reference: TaskRef) -> Result<bool, MutationError> {
        let _guard = self.begin()?;
        Ok(self.inner.lock().await.toggle_completion(reference)?)
    }

    /// Remove the referenced task after the delay.
    ///
    /// The reference is resolved before waiting, so view changes made during
    /// the delay do not change which task is removed.
    ///
    /// # Errors
    /// Returns [`MutationError::Busy`] while another mutation is pending, or
    /// the collection error when the reference does not name a task.
    pub async fn delete_task(&self, reference: TaskRef) -> Result<Task, MutationError> {
        let _guard = self.begin()?;
        let id = self.inner.lock().await.resolve(reference)?;
        self.pause().await;
        Ok(self.inner.lock().await.delete_task(TaskRef::Id(id))?)
    }

    /// Drop every completed task.
    ///
    /// # Errors
    /// Returns [`MutationError::Busy`] while another mutation is pending.
    pub async fn clear_completed(&self) -> Result<usize, MutationError> {
        let _guard = self.begin()?;
        Ok(self.inner.lock().await.clear_completed())
    }

    /// Put the form into edit mode. Allowed while a mutation is pending.
    ///
    /// # Errors
    /// Returns an error when the reference does not name a task.
    pub async fn begin_edit(&self, reference: TaskRef) -> Result<TaskId, CollectionError> {
        self.inner.lock().await.begin_edit(reference)
    }
}
