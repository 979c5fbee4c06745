//! A plan-view session: one board, one write queue, one user.
//!
//! Every change follows the same two phases. [`PlanSession::apply_locally`]
//! updates the board synchronously and [`PlanSession::schedule_remote_write`]
//! hands the matching durable operation to the queue. [`PlanSession::commit`]
//! runs both after validating the mutation, so a mutation whose course id
//! cannot be resolved is rejected before the board changes.

use std::{collections::HashMap, sync::Arc};

use crate::{
    board::{Board, BoardMutation},
    drag::DropEvent,
    error::{PlanError, Result},
    graph::RelationshipGraph,
    models::{Course, CourseRecord, PrereqTree, SemesterId},
    queue::{Operation, QueueConfig, QueueStatus, WriteQueue},
    store::PlanStore,
};

pub struct PlanSession {
    user_id: u64,
    board: Board,
    queue: WriteQueue,
}

impl PlanSession {
    pub fn new(user_id: u64, board: Board, queue: WriteQueue) -> Self {
        Self {
            user_id,
            board,
            queue,
        }
    }

    /// Starts a session with its own queue writing to `store`.
    pub fn start<S: PlanStore>(user_id: u64, board: Board, store: Arc<S>, config: QueueConfig) -> Self {
        Self::new(user_id, board, WriteQueue::spawn(store, config))
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn queue(&self) -> &WriteQueue {
        &self.queue
    }

    /// Applies a mutation to the board. Always succeeds.
    pub fn apply_locally(&mut self, mutation: &BoardMutation) {
        self.board.apply(mutation);
    }

    /// Hands a durable write to the queue without waiting for it.
    pub fn schedule_remote_write(&self, op: Operation) -> Result<()> {
        self.queue.enqueue(op)
    }

    /// Validates, applies and schedules one mutation. Returns the operation
    /// that was queued, if the mutation needs one.
    ///
    /// # Errors
    ///
    /// Resolution and validation failures leave the board untouched.
    pub fn commit(&mut self, mutation: BoardMutation) -> Result<Option<Operation>> {
        let op = self
            .board
            .remote_operation(&mutation, self.user_id)
            .inspect_err(|e| log::error!("Rejected board change {mutation:?}: {e}"))?;

        self.apply_locally(&mutation);
        if let Some(op) = &op {
            self.schedule_remote_write(op.clone())?;
        }
        Ok(op)
    }

    /// Resolves and commits a finished drag.
    pub fn drop_course(&mut self, event: &DropEvent) -> Result<Option<Operation>> {
        match self.board.resolve_drop(event)? {
            Some(mutation) => self.commit(mutation),
            None => Ok(None),
        }
    }

    pub fn add_semester(&mut self, semester: SemesterId) -> Result<Option<Operation>> {
        self.commit(BoardMutation::AddSemester { semester })
    }

    pub fn delete_semester(&mut self, semester: SemesterId) -> Result<Option<Operation>> {
        self.commit(BoardMutation::DeleteSemester { semester })
    }

    pub fn toggle_completed(&mut self, semester: SemesterId) -> Result<()> {
        self.commit(BoardMutation::ToggleCompleted { semester })?;
        Ok(())
    }

    /// Places a catalog course in a semester. Returns the card's new display
    /// id together with the write queued for it.
    pub fn add_course(
        &mut self,
        semester: SemesterId,
        record: &CourseRecord,
    ) -> Result<(String, Option<Operation>)> {
        let display_id = self.board.next_display_id(record);
        let op = self.commit(BoardMutation::AddCourse {
            semester,
            course: Course::from_record(display_id.clone(), record),
            course_id: record.id,
        })?;
        Ok((display_id, op))
    }

    /// Removes a card from whichever semester holds it.
    pub fn remove_course(&mut self, display_id: &str) -> Result<Option<Operation>> {
        let (semester, _) = self.board.locate(display_id).ok_or_else(|| PlanError::NotOnBoard {
            entity: "Course",
            id: display_id.to_string(),
        })?;
        self.commit(BoardMutation::RemoveCourse {
            semester,
            display_id: display_id.to_string(),
        })
    }

    /// Relationship graph over the cards currently on the board.
    pub fn relationships(&self, prerequisites: &HashMap<u64, PrereqTree>) -> RelationshipGraph {
        RelationshipGraph::build(&self.board.visible_courses(), prerequisites)
    }

    /// Waits until every write scheduled so far has been executed or dropped.
    pub async fn flush(&self) -> Result<QueueStatus> {
        self.queue.wait_idle().await
    }

    /// Persists pending writes and stops the queue, returning the board as it
    /// stands and the queue's final status.
    pub async fn close(self) -> Result<(Board, QueueStatus)> {
        let status = self.queue.shutdown().await?;
        Ok((self.board, status))
    }
}
