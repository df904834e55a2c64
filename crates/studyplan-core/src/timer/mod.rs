mod engine;
mod schedule;
mod ticker;

pub use engine::{PhaseExpiry, PhaseTimer, TickToken, TimerState};
pub use schedule::{Phase, PomodoroSettings};
pub use ticker::{ImmediateTicker, IntervalTicker, Ticker};
