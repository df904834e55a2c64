//! # Studyplan Core Library
//!
//! The core business logic of the studyplan Pomodoro study planner. Front
//! ends (the `studyplan` CLI today) only forward user intents to a
//! [`StudySession`] and render the [`Event`]s it returns.
//!
//! ## Architecture
//!
//! - **Tasks**: The task model, deterministic priority/difficulty ordering and
//!   the pending/completed/incomplete queue with priority-consistent
//!   reinsertion
//! - **Timer**: A countdown state machine over work and break phases, driven
//!   by an injectable [`Ticker`] and guarded against stale ticks
//! - **Session**: The planning / active / complete controller tying the queue
//!   to the timer
//! - **Extraction**: Free-text to task drafts through a language-model service
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`StudySession`]: Session state machine
//! - [`TaskQueue`]: Ordered task repository
//! - [`PhaseTimer`]: Work/break countdown
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod extract;
pub mod session;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, ExtractError, SessionError, ValidationError};
pub use events::Event;
pub use extract::{parse_task_drafts, AnthropicExtractor, TaskExtractor};
pub use session::{SessionState, SessionSummary, StudySession};
pub use storage::Config;
pub use task::ordering::sort_tasks;
pub use task::queue::{Reinsertion, TaskQueue};
pub use task::{CompletionState, Difficulty, Priority, Task, TaskDraft};
pub use timer::{
    ImmediateTicker, IntervalTicker, Phase, PhaseTimer, PomodoroSettings, TickToken, Ticker,
    TimerState,
};
