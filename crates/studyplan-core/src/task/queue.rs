//! Task queue repository.
//!
//! Owns the three disjoint task collections of a session: the ordered pending
//! queue, the completed list and the incomplete list. A task lives in exactly
//! one of them at a time, and only [`TaskQueue::add`] / [`TaskQueue::add_all`]
//! change the total count.

use serde::{Deserialize, Serialize};
use tracing::debug;

use std::collections::HashSet;

use super::ordering::{renumber, sort_in_place};
use super::{new_task_id, Task};
use crate::error::ValidationError;

/// Where a "continue later" task ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Reinsertion {
    /// Back in the pending queue at `index`
    Requeued { index: usize },
    /// Out of planned cycles, moved to the incomplete list
    Abandoned,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQueue {
    pending: Vec<Task>,
    completed: Vec<Task>,
    incomplete: Vec<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pending(&self) -> &[Task] {
        &self.pending
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    pub fn incomplete(&self) -> &[Task] {
        &self.incomplete
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Task count across all three collections.
    pub fn total_len(&self) -> usize {
        self.pending.len() + self.completed.len() + self.incomplete.len()
    }

    pub fn peek_head(&self) -> Option<&Task> {
        self.pending.first()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.pending.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.pending.get_mut(index)
    }

    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.pending.iter().position(|t| t.id == task_id)
    }

    /// Whether any task in the pending, completed or incomplete list has `id`.
    /// A blank id counts as taken.
    pub fn contains_id(&self, id: &str) -> bool {
        id.trim().is_empty()
            || self
                .pending
                .iter()
                .chain(&self.completed)
                .chain(&self.incomplete)
                .any(|t| t.id == id)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Validate and insert a task, then re-sort the pending queue.
    ///
    /// Returns the task's position after sorting. An id that is blank or
    /// already held by another task in the queue is replaced with a fresh one.
    pub fn add(&mut self, mut task: Task) -> Result<usize, ValidationError> {
        task.validate()?;
        if self.contains_id(&task.id) {
            task.id = new_task_id();
        }
        let id = task.id.clone();
        self.pending.push(task);
        sort_in_place(&mut self.pending);
        let index = self.position(&id).unwrap_or(self.pending.len() - 1);
        debug!(task_id = %id, index, "task queued");
        Ok(index)
    }

    /// Insert a batch of tasks as one unit.
    ///
    /// Blank-named tasks are dropped; any other invalid task rejects the whole
    /// batch and leaves the queue unchanged. Returns how many were added.
    pub fn add_all(&mut self, tasks: Vec<Task>) -> Result<usize, ValidationError> {
        let mut tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|t| !t.name.trim().is_empty())
            .collect();
        for task in &tasks {
            task.validate()?;
        }
        let mut seen = HashSet::new();
        for task in &mut tasks {
            if self.contains_id(&task.id) || !seen.insert(task.id.clone()) {
                task.id = new_task_id();
                seen.insert(task.id.clone());
            }
        }
        let count = tasks.len();
        self.pending.extend(tasks);
        sort_in_place(&mut self.pending);
        Ok(count)
    }

    /// Remove a pending task during planning.
    pub fn remove(&mut self, index: usize) -> Result<Task, ValidationError> {
        let task = self.take(index)?;
        renumber(&mut self.pending);
        Ok(task)
    }

    /// Remove the task at `index` from active rotation and hand it back.
    pub fn remove_active(&mut self, index: usize) -> Result<Task, ValidationError> {
        self.take(index)
    }

    /// Move the task at `index` to the completed list.
    pub fn complete(&mut self, index: usize) -> Result<&Task, ValidationError> {
        let mut task = self.take(index)?;
        task.mark_completed();
        renumber(&mut self.pending);
        self.completed.push(task);
        Ok(&self.completed[self.completed.len() - 1])
    }

    /// "Continue later": credit the cycle just spent on `task`, then carry it
    /// forward from `from`, the position it was removed from.
    pub fn reinsert(&mut self, mut task: Task, from: usize) -> Reinsertion {
        task.record_work_unit();
        self.carry_forward(task, from)
    }

    /// Second half of [`reinsert`](Self::reinsert) for a task whose cycle has
    /// already been credited.
    ///
    /// A task with more than one planned cycle left loses one and is placed
    /// before the first strictly lower-priority task at or after `from`
    /// (or at the end). Difficulty is not re-applied. A task on its last
    /// planned cycle goes to the incomplete list instead.
    pub fn carry_forward(&mut self, mut task: Task, from: usize) -> Reinsertion {
        if !task.carry_forward() {
            debug!(task_id = %task.id, "no planned cycles left, marking incomplete");
            task.mark_incomplete();
            self.incomplete.push(task);
            return Reinsertion::Abandoned;
        }
        let index = self.placement_index(&task, from);
        debug!(task_id = %task.id, index, remaining = task.estimated_work_units, "task requeued");
        self.pending.insert(index, task);
        renumber(&mut self.pending);
        Reinsertion::Requeued { index }
    }

    /// Empty the repository, returning pending then incomplete tasks ready for
    /// the next planning round. Completed tasks are dropped.
    pub fn drain_carry_over(&mut self) -> Vec<Task> {
        self.completed.clear();
        let mut carried: Vec<Task> = self
            .pending
            .drain(..)
            .chain(self.incomplete.drain(..))
            .collect();
        for task in &mut carried {
            task.replan();
        }
        carried
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn take(&mut self, index: usize) -> Result<Task, ValidationError> {
        if index >= self.pending.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "pending tasks".into(),
                index,
                len: self.pending.len(),
            });
        }
        Ok(self.pending.remove(index))
    }

    fn placement_index(&self, task: &Task, from: usize) -> usize {
        let start = from.min(self.pending.len());
        let rank = task.priority.rank();
        self.pending[start..]
            .iter()
            .position(|t| t.priority.rank() > rank)
            .map_or(self.pending.len(), |offset| start + offset)
    }
}
