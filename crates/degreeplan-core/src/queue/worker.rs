//! The executor task behind a [`WriteQueue`](super::WriteQueue).

use std::{ops::ControlFlow, sync::Arc};

use log::{debug, error, info, warn};
use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant},
};

use super::{Command, Operation, QueueConfig, QueuePhase, QueueStats, QueueStatus};
use crate::store::PlanStore;

/// A pending operation with its retry count and enqueue sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Queued {
    pub op: Operation,
    pub retries: u32,
    pub seq: u64,
}

/// Collapses operations that share a key to the most recently enqueued one.
///
/// Operations are replayed in enqueue order. A later operation replaces an
/// earlier one with the same key only when nothing in between touches the
/// same course or semester; otherwise both are kept so the store sees every
/// intermediate step. Successive moves of one course merge into a single
/// move from the first source to the last destination, and a merged move
/// that ends where it started is dropped. Returns the survivors and how many
/// operations were discarded.
pub(super) fn coalesce(mut pending: Vec<Queued>) -> (Vec<Queued>, u64) {
    let total = pending.len();
    pending.sort_by_key(|queued| queued.seq);

    let mut survivors: Vec<Queued> = Vec::with_capacity(total);
    for mut queued in pending {
        let key = queued.op.key();
        let earlier = survivors
            .iter()
            .rposition(|s| s.op.key() == key || s.op.conflicts_with(&queued.op))
            .filter(|&idx| survivors[idx].op.key() == key);

        if let Some(idx) = earlier {
            match (&survivors[idx].op, &mut queued.op) {
                (
                    Operation::MoveCourse {
                        source: first,
                        destination: via,
                        ..
                    },
                    Operation::MoveCourse { source, .. },
                ) => {
                    if via == source {
                        *source = *first;
                        survivors.remove(idx);
                    }
                }
                _ => {
                    survivors.remove(idx);
                }
            }
        }

        if let Operation::MoveCourse {
            source,
            destination,
            ..
        } = &queued.op
        {
            if source == destination {
                debug!("Dropping move of course that returns to {destination}");
                continue;
            }
        }
        survivors.push(queued);
    }

    let discarded = (total - survivors.len()) as u64;
    (survivors, discarded)
}

enum State {
    Idle,
    Scheduled(Instant),
}

pub(super) struct Worker<S> {
    store: Arc<S>,
    config: QueueConfig,
    pending: Vec<Queued>,
    next_seq: u64,
    received: u64,
    stats: QueueStats,
    status: watch::Sender<QueueStatus>,
}

impl<S: PlanStore> Worker<S> {
    pub(super) fn new(store: Arc<S>, config: QueueConfig, status: watch::Sender<QueueStatus>) -> Self {
        Self {
            store,
            config,
            pending: Vec::new(),
            next_seq: 0,
            received: 0,
            stats: QueueStats::default(),
            status,
        }
    }

    pub(super) async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        let mut state = State::Idle;
        loop {
            state = match state {
                State::Idle => {
                    let Some(command) = receiver.recv().await else {
                        break;
                    };
                    if self.accept(command).is_break() || self.drain(&mut receiver).is_break() {
                        break;
                    }
                    match self.pending.len() {
                        0 => {
                            self.publish(QueuePhase::Idle, 0);
                            State::Idle
                        }
                        1 => {
                            debug!("Single pending operation, executing immediately");
                            self.execute_pass().await;
                            match self.after_pass(&mut receiver) {
                                ControlFlow::Continue(next) => next,
                                ControlFlow::Break(()) => break,
                            }
                        }
                        _ => self.schedule(),
                    }
                }
                State::Scheduled(deadline) => {
                    tokio::select! {
                        command = receiver.recv() => {
                            let Some(command) = command else {
                                break;
                            };
                            if self.accept(command).is_break() {
                                break;
                            }
                            if self.pending.is_empty() {
                                self.publish(QueuePhase::Idle, 0);
                                State::Idle
                            } else {
                                self.schedule()
                            }
                        }
                        () = time::sleep_until(deadline) => {
                            self.execute_pass().await;
                            match self.after_pass(&mut receiver) {
                                ControlFlow::Continue(next) => next,
                                ControlFlow::Break(()) => break,
                            }
                        }
                    }
                }
            };
        }

        self.flush().await;
        debug!("Write queue worker stopped");
    }

    fn accept(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Enqueue(op) => {
                self.received += 1;
                self.next_seq += 1;
                debug!("Queued {op}");
                self.pending.push(Queued {
                    op,
                    retries: 0,
                    seq: self.next_seq,
                });
                ControlFlow::Continue(())
            }
            Command::Clear => {
                let cleared = self.pending.len() as u64;
                self.pending.clear();
                self.stats.cleared += cleared;
                debug!("Cleared {cleared} pending operation(s)");
                ControlFlow::Continue(())
            }
            Command::Shutdown => ControlFlow::Break(()),
        }
    }

    /// Takes every command already waiting in the channel.
    fn drain(&mut self, receiver: &mut mpsc::UnboundedReceiver<Command>) -> ControlFlow<()> {
        while let Ok(command) = receiver.try_recv() {
            if self.accept(command).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Decides the next state once a pass is done; commands that arrived
    /// during the pass start a new debounce window.
    fn after_pass(&mut self, receiver: &mut mpsc::UnboundedReceiver<Command>) -> ControlFlow<(), State> {
        if self.drain(receiver).is_break() {
            return ControlFlow::Break(());
        }
        if self.pending.is_empty() {
            self.publish(QueuePhase::Idle, 0);
            ControlFlow::Continue(State::Idle)
        } else {
            ControlFlow::Continue(self.schedule())
        }
    }

    fn schedule(&mut self) -> State {
        let deadline = Instant::now() + self.config.debounce;
        debug!(
            "Debouncing {} pending operation(s) for {:?}",
            self.pending.len(),
            self.config.debounce
        );
        self.publish(QueuePhase::Scheduled, self.pending.len());
        State::Scheduled(deadline)
    }

    /// Coalesces the pending operations and executes the survivors in order.
    async fn execute_pass(&mut self) {
        let (batch, discarded) = coalesce(std::mem::take(&mut self.pending));
        self.stats.superseded += discarded;
        if discarded > 0 {
            debug!("Coalesced away {discarded} superseded operation(s)");
        }

        let mut remaining = batch.len();
        self.publish(QueuePhase::Executing, remaining);
        for mut queued in batch {
            match queued.op.execute(self.store.as_ref()).await {
                Ok(()) => {
                    info!("Executed {}", queued.op);
                    self.stats.executed += 1;
                }
                Err(e) if e.is_benign() => {
                    warn!("Dropping {}: already applied ({e})", queued.op);
                    self.stats.benign += 1;
                }
                Err(e) if e.is_retryable() && queued.retries < self.config.max_retries => {
                    queued.retries += 1;
                    warn!(
                        "Retrying {} (attempt {} of {}): {e}",
                        queued.op,
                        queued.retries,
                        self.config.max_retries
                    );
                    self.stats.retried += 1;
                    self.pending.push(queued);
                }
                Err(e) => {
                    error!(
                        "Giving up on {} after {} retries: {e}",
                        queued.op, queued.retries
                    );
                    self.stats.failed += 1;
                }
            }
            remaining -= 1;
            self.publish(QueuePhase::Executing, remaining + self.pending.len());
        }
    }

    /// Executes everything still pending, ignoring the debounce window.
    async fn flush(&mut self) {
        while !self.pending.is_empty() {
            self.execute_pass().await;
        }
        self.publish(QueuePhase::Idle, 0);
    }

    fn publish(&self, phase: QueuePhase, pending: usize) {
        self.status.send_replace(QueueStatus {
            phase,
            pending,
            received: self.received,
            stats: self.stats,
        });
    }
}
