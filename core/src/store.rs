//! Client-side task store.
//!
//! # Design
//! `TaskStore` owns the canonical task collection for a UI session and is
//! the only thing that mutates it. Methods take `&self`, so several calls
//! may be in flight at once and interleave at their `.await` points. The
//! lock around the state is held only for synchronous snapshot or splice
//! steps, never across an `.await`, so each local mutation is atomic with
//! respect to the others.
//!
//! Writes are confirm-then-apply: the collection changes only after the
//! server has answered, and always with the server's copy of the task.
//! Failures land in `error()` and the method returns `None`/`false`.
//!
//! Only the startup fetch retries, at a fixed interval, to ride out a
//! backend that is still starting. Overlapping writes are not coordinated:
//! whichever response arrives last wins the local replacement.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::{error, info, warn};

use crate::api::TaskService;
use crate::error::ApiError;
use crate::types::{NewTask, PriorityBuckets, Task, TaskFilter};

const FETCH_FAILED: &str = "failed to fetch tasks, check that the backend service is running";
const ADD_FAILED: &str = "failed to add task";
const EDIT_FAILED: &str = "failed to update task";
const REMOVE_FAILED: &str = "failed to delete task";
const STATUS_FAILED: &str = "failed to update task status";

/// Fixed-interval retry for the startup fetch. The delay never grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<Task>,
    error: String,
    current_task: Option<Task>,
}

pub struct TaskStore<S> {
    service: S,
    retry: RetryPolicy,
    state: RwLock<StoreState>,
    in_flight: AtomicUsize,
}

/// Marks one store-initiated request chain as in flight until dropped.
struct Loading<'a>(&'a AtomicUsize);

impl<'a> Loading<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<S: TaskService> TaskStore<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            retry: RetryPolicy::default(),
            state: RwLock::new(StoreState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Seed the collection, e.g. from a previous session's snapshot.
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.write().tasks = tasks;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// True while any request started by this store is in flight, including
    /// the waits between fetch retries.
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    /// Last failure message, empty when the last operation succeeded.
    pub fn error(&self) -> String {
        self.read().error.clone()
    }

    pub fn current_task(&self) -> Option<Task> {
        self.read().current_task.clone()
    }

    pub fn set_current_task(&self, task: Option<Task>) {
        self.write().current_task = task;
    }

    pub fn reset_error(&self) {
        self.write().error.clear();
    }

    pub fn completed_tasks(&self) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|task| task.completed)
            .cloned()
            .collect()
    }

    pub fn pending_tasks(&self) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|task| !task.completed)
            .cloned()
            .collect()
    }

    pub fn priority_tasks(&self) -> PriorityBuckets {
        PriorityBuckets::from_tasks(&self.read().tasks)
    }

    /// Load the full collection using the store's retry policy.
    pub async fn fetch_tasks(&self) -> bool {
        self.fetch_tasks_with(self.retry).await
    }

    /// Load the full collection, retrying up to `policy.retries` times with
    /// `policy.delay` between attempts. On success the collection is
    /// replaced wholesale; on exhaustion it is left as it was.
    pub async fn fetch_tasks_with(&self, policy: RetryPolicy) -> bool {
        let _loading = Loading::enter(&self.in_flight);
        self.write().error.clear();

        let mut retries_left = policy.retries;
        loop {
            match self.service.list(TaskFilter::default()).await {
                Ok(tasks) => {
                    info!(count = tasks.len(), "fetched tasks");
                    let mut state = self.write();
                    state.tasks = tasks;
                    state.error.clear();
                    return true;
                }
                Err(err) if retries_left > 0 => {
                    warn!(
                        retries_left,
                        delay_ms = policy.delay.as_millis() as u64,
                        "failed to fetch tasks, retrying: {err}"
                    );
                    retries_left -= 1;
                    tokio::time::sleep(policy.delay).await;
                }
                Err(err) => {
                    error!("failed to fetch tasks: {err}");
                    self.write().error = failure_message(&err, FETCH_FAILED);
                    return false;
                }
            }
        }
    }

    /// Create a task and append the server's copy (with its new id).
    pub async fn add_task(&self, task: NewTask) -> Option<Task> {
        let _loading = Loading::enter(&self.in_flight);
        let created = self.confirm(self.service.create(task), ADD_FAILED).await?;
        self.write().tasks.push(created.clone());
        Some(created)
    }

    /// Replace a task's full state. The local copy is swapped only if the
    /// id is still in the collection.
    pub async fn edit_task(&self, id: i64, task: NewTask) -> Option<Task> {
        let _loading = Loading::enter(&self.in_flight);
        let updated = self.confirm(self.service.update(id, task), EDIT_FAILED).await?;
        self.replace(id, &updated);
        Some(updated)
    }

    pub async fn remove_task(&self, id: i64) -> bool {
        let _loading = Loading::enter(&self.in_flight);
        if self.confirm(self.service.delete(id), REMOVE_FAILED).await.is_none() {
            return false;
        }
        self.write().tasks.retain(|task| task.id != Some(id));
        true
    }

    pub async fn mark_task_complete(&self, id: i64) -> Option<Task> {
        let _loading = Loading::enter(&self.in_flight);
        let updated = self.confirm(self.service.complete(id), STATUS_FAILED).await?;
        self.replace(id, &updated);
        Some(updated)
    }

    pub async fn mark_task_uncomplete(&self, id: i64) -> Option<Task> {
        let _loading = Loading::enter(&self.in_flight);
        let updated = self.confirm(self.service.uncomplete(id), STATUS_FAILED).await?;
        self.replace(id, &updated);
        Some(updated)
    }

    /// Clear the error, await the call once, and record its failure.
    async fn confirm<R>(
        &self,
        call: impl Future<Output = Result<R, ApiError>>,
        fallback: &str,
    ) -> Option<R> {
        self.write().error.clear();
        match call.await {
            Ok(value) => Some(value),
            Err(err) => {
                error!("{fallback}: {err}");
                self.write().error = failure_message(&err, fallback);
                None
            }
        }
    }

    /// Swap in the server's copy; a missing id is a no-op, never an insert.
    fn replace(&self, id: i64, task: &Task) {
        let mut state = self.write();
        if let Some(slot) = state.tasks.iter_mut().find(|t| t.id == Some(id)) {
            *slot = task.clone();
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    let message = err.message().trim();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}
