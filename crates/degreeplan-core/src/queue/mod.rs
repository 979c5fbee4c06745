//! Write-coalescing operation queue.
//!
//! Plan mutations are persisted by a single executor task. Callers hand it
//! [`Operation`]s through [`WriteQueue::enqueue`], which never blocks. The
//! executor moves between three phases:
//!
//! - **Idle**: nothing pending. A lone operation arriving here runs at once.
//! - **Scheduled**: a debounce window is open; every new operation restarts
//!   it so that bursts of drags collapse into one pass.
//! - **Executing**: a pass is running. New operations wait in the channel
//!   until it completes.
//!
//! Before each pass, operations sharing a [`CoalesceKey`] collapse to the
//! most recently enqueued one. Failures are classified with
//! [`PlanError::is_benign`] (dropped) and [`PlanError::is_retryable`]
//! (requeued at the tail up to [`QueueConfig::max_retries`] times).
//!
//! [`PlanError::is_benign`]: crate::PlanError::is_benign
//! [`PlanError::is_retryable`]: crate::PlanError::is_retryable

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::Serialize;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    error::{PlanError, Result},
    store::PlanStore,
};

pub mod operation;
mod worker;


pub use operation::{CoalesceKey, Operation, OperationKind, Subject};

/// Tuning for the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Quiet period after the last enqueue before a batch runs
    pub debounce: Duration,
    /// Requeues allowed for a retryable failure before it is dropped
    pub max_retries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuePhase {
    Idle,
    Scheduled,
    Executing,
}

/// Running totals since the queue was spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub executed: u64,
    /// Discarded by coalescing
    pub superseded: u64,
    /// Dropped because the store was already in the desired state
    pub benign: u64,
    /// Requeues after a retryable failure
    pub retried: u64,
    /// Dropped after a terminal failure or exhausted retries
    pub failed: u64,
    /// Dropped by [`WriteQueue::clear`]
    pub cleared: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub phase: QueuePhase,
    /// Operations accepted by the executor and not yet finished
    pub pending: usize,
    /// Operations the executor has taken off the channel
    pub received: u64,
    pub stats: QueueStats,
}

impl Default for QueueStatus {
    fn default() -> Self {
        Self {
            phase: QueuePhase::Idle,
            pending: 0,
            received: 0,
            stats: QueueStats::default(),
        }
    }
}

enum Command {
    Enqueue(Operation),
    Clear,
    Shutdown,
}

/// Handle to a running executor task.
///
/// Created once per plan view and torn down with [`shutdown`](Self::shutdown),
/// which persists whatever is still pending.
pub struct WriteQueue {
    sender: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<QueueStatus>,
    submitted: AtomicU64,
    handle: JoinHandle<()>,
}

impl WriteQueue {
    /// Spawns the executor on the current tokio runtime.
    pub fn spawn<S: PlanStore>(store: Arc<S>, config: QueueConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(QueueStatus::default());
        let worker = worker::Worker::new(store, config, status_tx);
        let handle = tokio::spawn(worker.run(receiver));
        Self {
            sender,
            status,
            submitted: AtomicU64::new(0),
            handle,
        }
    }

    /// Hands an operation to the executor without waiting for it.
    pub fn enqueue(&self, op: Operation) -> Result<()> {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        self.sender.send(Command::Enqueue(op)).map_err(|_| {
            self.submitted.fetch_sub(1, Ordering::SeqCst);
            PlanError::Configuration {
                message: "Write queue is closed".to_string(),
            }
        })
    }

    /// Drops every operation that has not started executing.
    pub fn clear(&self) -> Result<()> {
        self.sender.send(Command::Clear).map_err(|_| PlanError::Configuration {
            message: "Write queue is closed".to_string(),
        })
    }

    /// Latest published executor status.
    pub fn status(&self) -> QueueStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<QueueStatus> {
        self.status.clone()
    }

    /// Waits until everything enqueued so far has been executed or dropped.
    pub async fn wait_idle(&self) -> Result<QueueStatus> {
        let target = self.submitted.load(Ordering::SeqCst);
        let mut status = self.status.clone();
        let idle = status
            .wait_for(|s| s.received >= target && s.phase == QueuePhase::Idle && s.pending == 0)
            .await
            .map(|s| QueueStatus::clone(&s));
        idle.map_err(|_| PlanError::Configuration {
            message: "Write queue worker stopped".to_string(),
        })
    }

    /// Persists everything still pending, stops the executor and returns its
    /// final status.
    pub async fn shutdown(self) -> Result<QueueStatus> {
        // The worker also flushes when the channel closes, so a failed send is fine.
        let _ = self.sender.send(Command::Shutdown);
        self.handle.await.map_err(|e| PlanError::Configuration {
            message: format!("Task join error: {e}"),
        })?;
        let status = self.status.borrow().clone();
        Ok(status)
    }
}
