//! Study task model.
//!
//! A [`Task`] is one unit of study work with a priority, a difficulty and a
//! planned number of work cycles. Tasks enter the pending queue through
//! [`TaskDraft`]s (typed in by hand or produced by a
//! [`TaskExtractor`](crate::extract::TaskExtractor)) and leave it as either
//! completed or incomplete.

pub mod ordering;
pub mod queue;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// How urgent a task is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Sort rank: lower sorts earlier (urgent = 0, low = 3).
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("expected low|medium|high|urgent, got '{other}'"),
            }),
        }
    }
}

/// How much effort a task takes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Sort rank: easier tasks come first within a priority band.
    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ValidationError::InvalidValue {
                field: "difficulty".into(),
                message: format!("expected easy|medium|hard, got '{other}'"),
            }),
        }
    }
}

/// Where a task ended up once it left active rotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionState {
    /// Still waiting in the pending queue
    Pending,
    /// Finished by the user
    Completed,
    /// Out of planned cycles without being finished
    Incomplete,
}

impl Default for CompletionState {
    fn default() -> Self {
        CompletionState::Pending
    }
}

/// One unit of study work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Display name, never blank once queued
    pub name: String,
    pub difficulty: Difficulty,
    pub priority: Priority,
    /// Planned remaining work cycles (always positive)
    pub estimated_work_units: u32,
    /// Estimate at planning time; caps `work_units_spent`
    pub initial_work_units: u32,
    /// Work cycles completed while this task was active
    pub work_units_spent: u32,
    pub description: Option<String>,
    /// Why an extractor placed the task where it did
    pub reasoning: Option<String>,
    pub completion_state: CompletionState,
    /// 1-based display rank, recomputed on every sort
    pub order: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new task with default values (medium/medium, one cycle).
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            id: new_task_id(),
            name: name.into(),
            difficulty: Difficulty::Medium,
            priority: Priority::Medium,
            estimated_work_units: 1,
            initial_work_units: 1,
            work_units_spent: 0,
            description: None,
            reasoning: None,
            completion_state: CompletionState::Pending,
            order: 0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the planned number of work cycles.
    pub fn with_estimate(mut self, work_units: u32) -> Self {
        self.estimated_work_units = work_units;
        self.initial_work_units = work_units;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the task can enter the pending queue.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.estimated_work_units == 0 {
            return Err(ValidationError::InvalidValue {
                field: "estimated_work_units".into(),
                message: format!("task '{}' must plan at least one work cycle", self.name),
            });
        }
        Ok(())
    }

    /// Credit one finished work cycle. Returns `false` once the spent count
    /// already equals the planned total.
    pub fn record_work_unit(&mut self) -> bool {
        if self.work_units_spent >= self.initial_work_units {
            return false;
        }
        self.work_units_spent += 1;
        true
    }

    /// Consume one unit of the remaining estimate. Returns `false` when this
    /// was the last planned cycle, in which case the estimate stays as is.
    pub fn carry_forward(&mut self) -> bool {
        if self.estimated_work_units <= 1 {
            return false;
        }
        self.estimated_work_units -= 1;
        true
    }

    pub fn remaining_work_units(&self) -> u32 {
        self.estimated_work_units
    }

    /// 0.0 .. 1.0 share of the work done so far.
    pub fn progress(&self) -> f64 {
        let total = self.work_units_spent + self.estimated_work_units;
        if total == 0 {
            return 0.0;
        }
        (self.work_units_spent as f64 / total as f64).min(1.0)
    }

    pub fn mark_completed(&mut self) {
        self.completion_state = CompletionState::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn mark_incomplete(&mut self) {
        self.completion_state = CompletionState::Incomplete;
    }

    /// Prepare the task for a new planning round: back to pending, with the
    /// work already done plus what is left as the new planned total.
    ///
    /// The cap on `work_units_spent` holds within one planning round. Carrying
    /// a task into the next round starts a new plan with a raised cap.
    pub fn replan(&mut self) {
        self.completion_state = CompletionState::Pending;
        self.completed_at = None;
        self.initial_work_units = self.work_units_spent + self.estimated_work_units;
    }
}

impl Default for Task {
    fn default() -> Self {
        Task::new("")
    }
}

/// Task-shaped record before it enters the queue.
///
/// This is both the manual-entry form and the record shape returned by text
/// extraction, so the estimate also accepts the `estimated_pomodoros` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "estimated_pomodoros", default = "default_work_units")]
    pub estimated_work_units: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

fn default_work_units() -> u32 {
    1
}

impl TaskDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            estimated_work_units: default_work_units(),
            difficulty: Difficulty::default(),
            priority: Priority::default(),
            description: None,
            reasoning: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn estimate(mut self, work_units: u32) -> Self {
        self.estimated_work_units = work_units;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Build a task, backfilling the id when the draft carries none.
    pub fn into_task(self) -> Task {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_task_id);
        let mut task = Task::new(self.name.trim())
            .with_priority(self.priority)
            .with_difficulty(self.difficulty)
            .with_estimate(self.estimated_work_units);
        task.id = id;
        task.description = self.description.filter(|d| !d.trim().is_empty());
        task.reasoning = self.reasoning.filter(|r| !r.trim().is_empty());
        task
    }
}

impl From<TaskDraft> for Task {
    fn from(draft: TaskDraft) -> Self {
        draft.into_task()
    }
}

pub(crate) fn new_task_id() -> String {
    format!("task-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_defaults() {
        let task = Task::new("Read chapter 3");
        assert!(task.id.starts_with("task-"));
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.difficulty, Difficulty::Medium);
        assert_eq!(task.estimated_work_units, 1);
        assert_eq!(task.work_units_spent, 0);
        assert_eq!(task.completion_state, CompletionState::Pending);
    }

    #[test]
    fn blank_name_fails_validation() {
        assert_eq!(Task::new("   ").validate(), Err(ValidationError::EmptyName));
        assert!(Task::new("x").with_estimate(0).validate().is_err());
        assert!(Task::new("x").validate().is_ok());
    }

    #[test]
    fn ranks_put_urgent_and_easy_first() {
        assert!(Priority::Urgent.rank() < Priority::High.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert!(Difficulty::Easy.rank() < Difficulty::Hard.rank());
    }

    #[test]
    fn parse_priority_and_difficulty() {
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("critical".parse::<Priority>().is_err());
        assert!("trivial".parse::<Difficulty>().is_err());
    }

    #[test]
    fn record_work_unit_is_capped_by_plan() {
        let mut task = Task::new("Essay").with_estimate(2);
        assert!(task.record_work_unit());
        assert!(task.record_work_unit());
        assert!(!task.record_work_unit());
        assert_eq!(task.work_units_spent, 2);
    }

    #[test]
    fn carry_forward_keeps_last_unit() {
        let mut task = Task::new("Essay").with_estimate(2);
        assert!(task.carry_forward());
        assert_eq!(task.estimated_work_units, 1);
        assert!(!task.carry_forward());
        assert_eq!(task.estimated_work_units, 1);
    }

    #[test]
    fn replan_raises_planned_total() {
        let mut task = Task::new("Essay").with_estimate(1);
        task.record_work_unit();
        task.mark_incomplete();
        task.replan();
        assert_eq!(task.completion_state, CompletionState::Pending);
        assert_eq!(task.initial_work_units, 2);
        assert!(task.record_work_unit());
    }

    #[test]
    fn spent_is_capped_until_the_next_planning_round() {
        let mut task = Task::new("Proofs").with_estimate(1);
        assert!(task.record_work_unit());
        assert!(!task.record_work_unit());
        assert_eq!(task.work_units_spent, 1);

        task.mark_incomplete();
        task.replan();
        assert_eq!(task.initial_work_units, 2);
        assert!(task.record_work_unit());
        assert!(!task.record_work_unit());
        assert_eq!(task.work_units_spent, task.initial_work_units);
    }

    #[test]
    fn draft_accepts_pomodoro_key_and_backfills_id() {
        let json = r#"{"name":"Flashcards","estimated_pomodoros":3,"priority":"high","difficulty":"easy"}"#;
        let draft: TaskDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.estimated_work_units, 3);
        let task = draft.into_task();
        assert!(task.id.starts_with("task-"));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.initial_work_units, 3);
    }

    #[test]
    fn draft_keeps_given_id_and_trims_name() {
        let mut draft = TaskDraft::new("  Lab report ");
        draft.id = Some("lab-1".into());
        draft.description = Some("  ".into());
        let task = draft.into_task();
        assert_eq!(task.id, "lab-1");
        assert_eq!(task.name, "Lab report");
        assert_eq!(task.description, None);
    }

    #[test]
    fn progress_reflects_spent_share() {
        let mut task = Task::new("Problem set").with_estimate(4);
        assert_eq!(task.progress(), 0.0);
        task.record_work_unit();
        task.carry_forward();
        assert!((task.progress() - 0.25).abs() < f64::EPSILON);
    }
}
