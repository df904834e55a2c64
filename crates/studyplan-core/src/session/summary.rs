use serde::{Deserialize, Serialize};

use crate::task::Task;

/// End-of-session report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub completed: Vec<Task>,
    pub incomplete: Vec<Task>,
    /// Tasks still queued (empty once the session is complete)
    pub pending: Vec<Task>,
    pub completed_work_cycles: u32,
}

impl SessionSummary {
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn incomplete_count(&self) -> usize {
        self.incomplete.len()
    }

    pub fn total_tasks(&self) -> usize {
        self.completed.len() + self.incomplete.len() + self.pending.len()
    }

    /// Work cycles credited to tasks, across all three lists.
    pub fn work_units_spent(&self) -> u32 {
        self.completed
            .iter()
            .chain(&self.incomplete)
            .chain(&self.pending)
            .map(|t| t.work_units_spent)
            .sum()
    }

    /// Whether anything would carry over into the next planning round.
    pub fn has_carry_over(&self) -> bool {
        !self.incomplete.is_empty() || !self.pending.is_empty()
    }
}
