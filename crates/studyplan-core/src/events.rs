use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionState;
use crate::timer::Phase;

/// Every state change in a study session produces an Event.
/// The front end renders them; nothing in the core depends on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        name: String,
        index: usize,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        task_id: String,
        at: DateTime<Utc>,
    },
    TasksImported {
        count: usize,
        at: DateTime<Utc>,
    },
    SessionStarted {
        task_count: usize,
        at: DateTime<Utc>,
    },
    PhaseStarted {
        phase: Phase,
        duration_secs: u32,
        running: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
    PhaseExpired {
        expired: Phase,
        next: Phase,
        completed_work_cycles: u32,
        at: DateTime<Utc>,
    },
    /// A work phase finished; the active task needs a complete /
    /// continue-later decision.
    CompletionRequested {
        task_id: String,
        name: String,
        work_units_spent: u32,
        estimated_work_units: u32,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    TaskRequeued {
        task_id: String,
        name: String,
        index: usize,
        remaining_work_units: u32,
        at: DateTime<Utc>,
    },
    TaskAbandoned {
        task_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    TaskSkipped {
        from_index: usize,
        to_index: usize,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        completed: usize,
        incomplete: usize,
        completed_work_cycles: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_state: SessionState,
        phase: Phase,
        remaining_secs: u32,
        total_secs: u32,
        running: bool,
        completed_work_cycles: u32,
        active_task_id: Option<String>,
        awaiting_confirmation: bool,
        pending: usize,
        at: DateTime<Utc>,
    },
}
