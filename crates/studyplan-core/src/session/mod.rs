//! Study session controller.
//!
//! A session moves through three states:
//!
//! ```text
//! Planning --start--> Active --queue empty--> Complete
//!     ^                  |                        |
//!     +---------- return to dashboard ------------+
//! ```
//!
//! During planning, tasks are added, removed or imported. Once active, the
//! head of the queue is worked on while the [`PhaseTimer`] cycles through
//! work and break phases. Each finished work phase asks the user whether the
//! active task is done; the answer either completes the task or carries it
//! forward in the queue.
//!
//! Every command returns the [`Event`]s it produced so a front end can render
//! them without polling.

mod summary;

pub use summary::SessionSummary;

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::events::Event;
use crate::extract::TaskExtractor;
use crate::storage::Config;
use crate::task::queue::{Reinsertion, TaskQueue};
use crate::task::{Task, TaskDraft};
use crate::timer::{Phase, PhaseTimer, PomodoroSettings, TickToken, Ticker, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Planning,
    Active,
    Complete,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Planning
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Planning => "planning",
            SessionState::Active => "active",
            SessionState::Complete => "complete",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct StudySession {
    settings: PomodoroSettings,
    queue: TaskQueue,
    timer: PhaseTimer,
    state: SessionState,
    /// Index into the pending queue of the task being worked on
    active_index: usize,
    /// A work phase ended and the complete / continue-later decision is open
    awaiting_confirmation: bool,
}

impl StudySession {
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            queue: TaskQueue::new(),
            timer: PhaseTimer::new(settings),
            state: SessionState::Planning,
            active_index: 0,
            awaiting_confirmation: false,
        }
    }

    /// Build a session from the user's configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = config.settings()?;
        Ok(Self::new(settings).with_auto_start(config.timer.auto_start_next_phase))
    }

    /// Seed a new planning round with tasks carried over from the last one.
    pub fn with_tasks(mut self, carry_over: Vec<Task>) -> Result<Self> {
        self.add_tasks(carry_over)?;
        Ok(self)
    }

    /// Keep the timer running into the next phase after each expiry.
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.timer = self.timer.with_auto_start(auto_start);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The task being worked on. `None` outside an active session.
    pub fn active_task(&self) -> Option<&Task> {
        if self.state != SessionState::Active {
            return None;
        }
        self.queue.get(self.active_index)
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.snapshot()
    }

    /// Token for the next tick of the running timer.
    pub fn tick_token(&self) -> TickToken {
        self.timer.token()
    }

    /// Up to `n` tasks queued after the active one.
    pub fn upcoming(&self, n: usize) -> &[Task] {
        let pending = self.queue.pending();
        let start = (self.active_index + 1).min(pending.len());
        let end = start.saturating_add(n).min(pending.len());
        &pending[start..end]
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            completed: self.queue.completed().to_vec(),
            incomplete: self.queue.incomplete().to_vec(),
            pending: self.queue.pending().to_vec(),
            completed_work_cycles: self.timer.completed_work_cycles(),
        }
    }

    pub fn snapshot(&self) -> Event {
        let timer = self.timer.snapshot();
        Event::StateSnapshot {
            session_state: self.state,
            phase: timer.phase,
            remaining_secs: timer.remaining_secs,
            total_secs: timer.total_secs,
            running: timer.running,
            completed_work_cycles: timer.completed_work_cycles,
            active_task_id: self.active_task().map(|t| t.id.clone()),
            awaiting_confirmation: self.awaiting_confirmation,
            pending: self.queue.len(),
            at: Utc::now(),
        }
    }

    // ── Planning ─────────────────────────────────────────────────────

    /// Validate and queue one task. Returns the index it was sorted into.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Event> {
        self.require(SessionState::Planning)?;
        let index = self.queue.add(draft.into_task())?;
        let (task_id, name) = self
            .queue
            .get(index)
            .map(|t| (t.id.clone(), t.name.clone()))
            .unwrap_or_default();
        debug!(task_id = %task_id, index, "task added");
        Ok(Event::TaskAdded {
            task_id,
            name,
            index,
            at: Utc::now(),
        })
    }

    /// Queue a batch of tasks. Blank entries are skipped; any other invalid
    /// entry rejects the whole batch.
    pub fn add_tasks(&mut self, tasks: Vec<Task>) -> Result<Event> {
        self.require(SessionState::Planning)?;
        let count = self.queue.add_all(tasks)?;
        info!(count, queued = self.queue.len(), "tasks imported");
        Ok(Event::TasksImported {
            count,
            at: Utc::now(),
        })
    }

    pub fn import_drafts(&mut self, drafts: Vec<TaskDraft>) -> Result<Event> {
        self.add_tasks(drafts.into_iter().map(TaskDraft::into_task).collect())
    }

    /// Run `extractor` over free text and queue what it finds. On failure the
    /// queue is left as it was.
    pub async fn import_text<E: TaskExtractor>(
        &mut self,
        extractor: &E,
        text: &str,
    ) -> Result<Event> {
        self.require(SessionState::Planning)?;
        let drafts = match extractor.extract(text).await {
            Ok(drafts) => drafts,
            Err(err) => {
                warn!(extractor = extractor.name(), error = %err, "task extraction failed");
                return Err(err.into());
            }
        };
        self.import_drafts(drafts)
    }

    pub fn remove_task(&mut self, index: usize) -> Result<Event> {
        self.require(SessionState::Planning)?;
        let task = self.queue.remove(index)?;
        debug!(task_id = %task.id, "task removed");
        Ok(Event::TaskRemoved {
            task_id: task.id,
            at: Utc::now(),
        })
    }

    /// Begin working on the head of the queue with a running work phase.
    pub fn start_session(&mut self) -> Result<Vec<Event>> {
        self.require(SessionState::Planning)?;
        if self.queue.is_empty() {
            warn!("refusing to start a session with no tasks");
            return Err(SessionError::EmptyQueue.into());
        }
        self.state = SessionState::Active;
        self.active_index = 0;
        self.awaiting_confirmation = false;
        info!(
            tasks = self.queue.len(),
            estimate = %self.settings.format_estimate(self.queue.pending()),
            "study session started"
        );
        let started = Event::SessionStarted {
            task_count: self.queue.len(),
            at: Utc::now(),
        };
        Ok(vec![started, self.timer.begin_work()])
    }

    // ── Active ───────────────────────────────────────────────────────

    /// Pause or resume the timer. Refused while a work phase is held for
    /// an open completion decision.
    pub fn toggle_timer(&mut self) -> Result<Option<Event>> {
        self.require(SessionState::Active)?;
        if self.awaiting_confirmation && self.timer.phase() == Phase::Work {
            return Err(SessionError::ConfirmationPending.into());
        }
        Ok(self.timer.toggle_running())
    }

    /// Deliver one timer tick scheduled under `token`.
    ///
    /// Returns nothing for stale or ignored ticks. On expiry, returns the
    /// expiry, the phase that was loaded after it and, for a finished work
    /// phase, the completion request for the active task.
    pub fn on_tick(&mut self, token: TickToken) -> Vec<Event> {
        if self.state != SessionState::Active {
            return Vec::new();
        }
        let Some(expiry) = self.timer.tick(token) else {
            return Vec::new();
        };
        debug!(expired = ?expiry.expired, next = ?expiry.next, "phase expired");

        let mut follow_up = None;
        if expiry.expired == Phase::Work {
            follow_up = self.on_work_phase_expired();
        } else if self.awaiting_confirmation {
            // Hold the next work phase until the decision arrives.
            self.timer.halt();
        }

        let mut events = vec![Event::PhaseExpired {
            expired: expiry.expired,
            next: expiry.next,
            completed_work_cycles: expiry.completed_work_cycles,
            at: Utc::now(),
        }];
        events.push(self.phase_started());
        events.extend(follow_up);
        events
    }

    /// The active task is finished.
    pub fn confirm_task_complete(&mut self) -> Result<Vec<Event>> {
        self.require_confirmation()?;
        let task = self.queue.complete(self.active_index)?;
        info!(task_id = %task.id, spent = task.work_units_spent, "task completed");
        let mut events = vec![Event::TaskCompleted {
            task_id: task.id.clone(),
            name: task.name.clone(),
            at: Utc::now(),
        }];
        self.awaiting_confirmation = false;
        self.advance_to_head(&mut events);
        Ok(events)
    }

    /// The active task needs more time. Its cycle was already credited when
    /// the work phase expired, so only the carry-forward half applies.
    pub fn confirm_task_incomplete(&mut self) -> Result<Vec<Event>> {
        self.require_confirmation()?;
        let from = self.active_index;
        let task = self.queue.remove_active(from)?;
        let (task_id, name) = (task.id.clone(), task.name.clone());
        let at = Utc::now();
        let event = match self.queue.carry_forward(task, from) {
            Reinsertion::Requeued { index } => {
                let remaining_work_units = self
                    .queue
                    .get(index)
                    .map_or(0, |t| t.estimated_work_units);
                info!(task_id = %task_id, index, remaining_work_units, "task carried forward");
                Event::TaskRequeued {
                    task_id,
                    name,
                    index,
                    remaining_work_units,
                    at,
                }
            }
            Reinsertion::Abandoned => {
                info!(task_id = %task_id, "task out of planned cycles");
                Event::TaskAbandoned { task_id, name, at }
            }
        };
        let mut events = vec![event];
        self.awaiting_confirmation = false;
        self.advance_to_head(&mut events);
        Ok(events)
    }

    /// Move on to the next queued task without touching the current one.
    /// The timer is reset to a paused work phase.
    pub fn skip_active_task(&mut self) -> Result<Vec<Event>> {
        self.require(SessionState::Active)?;
        if self.awaiting_confirmation {
            return Err(SessionError::ConfirmationPending.into());
        }
        if self.active_index + 1 >= self.queue.len() {
            return Err(SessionError::NothingToSkip.into());
        }
        let from_index = self.active_index;
        self.active_index += 1;
        debug!(from_index, to_index = self.active_index, "task skipped");
        Ok(vec![
            Event::TaskSkipped {
                from_index,
                to_index: self.active_index,
                at: Utc::now(),
            },
            self.timer.reset_to_work(),
        ])
    }

    /// Leave an active or finished session and go back to planning.
    ///
    /// Returns the pending and incomplete tasks, replanned for another round.
    /// Completed tasks are dropped. The caller decides whether to queue the
    /// returned tasks again via [`add_tasks`](Self::add_tasks).
    pub fn return_to_dashboard(&mut self) -> Result<Vec<Task>> {
        if self.state == SessionState::Planning {
            return Err(SessionError::InvalidState {
                expected: SessionState::Active,
                actual: self.state,
            }
            .into());
        }
        self.timer.reset();
        let carried = self.queue.drain_carry_over();
        self.state = SessionState::Planning;
        self.active_index = 0;
        self.awaiting_confirmation = false;
        info!(carried_over = carried.len(), "returned to planning");
        Ok(carried)
    }

    /// Drive the timer with `ticker` until the current phase expires.
    ///
    /// Returns the expiry events, or nothing if the timer is paused or the
    /// session is not active.
    pub async fn run_until_expiry<T: Ticker>(&mut self, ticker: &mut T) -> Vec<Event> {
        while self.state == SessionState::Active && self.timer.is_running() {
            let token = self.timer.token();
            ticker.tick().await;
            let events = self.on_tick(token);
            if !events.is_empty() {
                return events;
            }
        }
        Vec::new()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn require_confirmation(&self) -> Result<(), SessionError> {
        self.require(SessionState::Active)?;
        if !self.awaiting_confirmation {
            return Err(SessionError::NoPendingConfirmation);
        }
        Ok(())
    }

    /// Credit the finished cycle to the active task and open the decision.
    fn on_work_phase_expired(&mut self) -> Option<Event> {
        if self.awaiting_confirmation {
            return None;
        }
        let task = self.queue.get_mut(self.active_index)?;
        task.record_work_unit();
        let event = Event::CompletionRequested {
            task_id: task.id.clone(),
            name: task.name.clone(),
            work_units_spent: task.work_units_spent,
            estimated_work_units: task.estimated_work_units,
            at: Utc::now(),
        };
        self.awaiting_confirmation = true;
        Some(event)
    }

    /// After a decision the head of the queue becomes active. An empty queue
    /// ends the session.
    fn advance_to_head(&mut self, events: &mut Vec<Event>) {
        self.active_index = 0;
        if !self.queue.is_empty() {
            return;
        }
        self.state = SessionState::Complete;
        events.extend(self.timer.stop());
        let completed = self.queue.completed().len();
        let incomplete = self.queue.incomplete().len();
        let completed_work_cycles = self.timer.completed_work_cycles();
        info!(completed, incomplete, completed_work_cycles, "study session complete");
        events.push(Event::SessionCompleted {
            completed,
            incomplete,
            completed_work_cycles,
            at: Utc::now(),
        });
    }

    fn phase_started(&self) -> Event {
        Event::PhaseStarted {
            phase: self.timer.phase(),
            duration_secs: self.timer.remaining_secs(),
            running: self.timer.is_running(),
            at: Utc::now(),
        }
    }
}
