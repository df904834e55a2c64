//! Phase timer implementation.
//!
//! The timer is a countdown state machine with no internal thread. The caller
//! delivers one tick per elapsed second (see [`Ticker`](super::Ticker)) and
//! reacts to the [`PhaseExpiry`] returned when a phase runs out.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Work -> (ShortBreak | LongBreak) -> Work -> ...
//! ```
//!
//! Every start, pause, resume, expiry and stop bumps a generation counter.
//! Ticks carry the [`TickToken`] they were issued under, so a tick from a
//! cancelled schedule never reaches the countdown.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(settings);
//! timer.begin_work();
//! // Once per second:
//! let token = timer.token();
//! if let Some(expiry) = timer.tick(token) { /* phase finished */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::schedule::{Phase, PomodoroSettings};
use crate::events::Event;

/// Proof that a tick was scheduled under a particular timer generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickToken {
    generation: u64,
}

impl TickToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Snapshot of the timer for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub running: bool,
    pub completed_work_cycles: u32,
    pub generation: u64,
}

/// A phase that ran down to zero and the phase loaded after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseExpiry {
    pub expired: Phase,
    pub next: Phase,
    pub completed_work_cycles: u32,
}

#[derive(Debug, Clone)]
pub struct PhaseTimer {
    settings: PomodoroSettings,
    phase: Phase,
    remaining_secs: u32,
    running: bool,
    completed_work_cycles: u32,
    generation: u64,
    /// Keep running into the next phase after an expiry.
    auto_start: bool,
}

impl PhaseTimer {
    /// Create an idle timer.
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            remaining_secs: 0,
            running: false,
            completed_work_cycles: 0,
            generation: 0,
            auto_start: false,
        }
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.settings.duration_secs(self.phase)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_cycles(&self) -> u32 {
        self.completed_work_cycles
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    /// Token for a tick scheduled now.
    pub fn token(&self) -> TickToken {
        TickToken {
            generation: self.generation,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn snapshot(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            running: self.running,
            completed_work_cycles: self.completed_work_cycles,
            generation: self.generation,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load a full work phase and start counting down.
    pub fn begin_work(&mut self) -> Event {
        self.load(Phase::Work);
        self.running = true;
        self.bump();
        self.phase_started()
    }

    /// Load a full work phase without starting it. Cycle count is kept.
    pub fn reset_to_work(&mut self) -> Event {
        self.load(Phase::Work);
        self.running = false;
        self.bump();
        self.phase_started()
    }

    /// Pause or resume. Phase and remaining time are untouched.
    pub fn toggle_running(&mut self) -> Option<Event> {
        if self.phase == Phase::Idle {
            return None;
        }
        self.running = !self.running;
        self.bump();
        let at = Utc::now();
        Some(if self.running {
            Event::TimerResumed {
                remaining_secs: self.remaining_secs,
                at,
            }
        } else {
            Event::TimerPaused {
                remaining_secs: self.remaining_secs,
                at,
            }
        })
    }

    /// Pause if running.
    pub fn halt(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.toggle_running()
    }

    /// Return to idle and cancel outstanding ticks.
    pub fn stop(&mut self) -> Option<Event> {
        if self.phase == Phase::Idle && !self.running {
            return None;
        }
        self.phase = Phase::Idle;
        self.remaining_secs = 0;
        self.running = false;
        self.bump();
        Some(Event::TimerStopped { at: Utc::now() })
    }

    /// Back to a fresh idle timer for a new planning round. The generation
    /// keeps counting so tokens from the old round stay stale.
    pub fn reset(&mut self) -> Event {
        self.phase = Phase::Idle;
        self.remaining_secs = 0;
        self.running = false;
        self.completed_work_cycles = 0;
        self.bump();
        Event::TimerStopped { at: Utc::now() }
    }

    /// Apply one elapsed second.
    ///
    /// Returns `Some` exactly once per phase, on the tick that brings the
    /// countdown to zero. Stale tokens, a paused timer and the idle phase are
    /// ignored.
    pub fn tick(&mut self, token: TickToken) -> Option<PhaseExpiry> {
        if token.generation != self.generation {
            debug!(
                tick_generation = token.generation,
                generation = self.generation,
                "ignoring stale tick"
            );
            return None;
        }
        if !self.running || self.phase == Phase::Idle {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        Some(self.expire())
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Transition out of the phase that just reached zero.
    fn expire(&mut self) -> PhaseExpiry {
        let expired = self.phase;
        let next = match expired {
            Phase::Work => {
                let next = self.settings.break_after(self.completed_work_cycles);
                self.completed_work_cycles += 1;
                next
            }
            _ => Phase::Work,
        };
        self.load(next);
        self.running = self.auto_start;
        self.bump();
        debug!(?expired, ?next, cycles = self.completed_work_cycles, "phase expired");
        PhaseExpiry {
            expired,
            next,
            completed_work_cycles: self.completed_work_cycles,
        }
    }

    fn load(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining_secs = self.settings.duration_secs(phase);
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn phase_started(&self) -> Event {
        Event::PhaseStarted {
            phase: self.phase,
            duration_secs: self.remaining_secs,
            running: self.running,
            at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_remaining_secs(&mut self, secs: u32) {
        self.remaining_secs = secs;
    }

    #[cfg(test)]
    pub(crate) fn set_completed_work_cycles(&mut self, cycles: u32) {
        self.completed_work_cycles = cycles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_minute() -> PomodoroSettings {
        PomodoroSettings::new(1, 1, 2, 4).unwrap()
    }

    /// Tick with a fresh token until the phase expires.
    fn run_phase(timer: &mut PhaseTimer) -> PhaseExpiry {
        loop {
            if let Some(expiry) = timer.tick(timer.token()) {
                return expiry;
            }
            assert!(timer.is_running(), "timer stopped before expiry");
        }
    }

    #[test]
    fn starts_idle() {
        let timer = PhaseTimer::new(PomodoroSettings::default());
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn begin_work_loads_work_duration() {
        let mut timer = PhaseTimer::new(PomodoroSettings::default());
        let event = timer.begin_work();
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.remaining_secs(), 25 * 60);
        assert!(timer.is_running());
        assert!(matches!(event, Event::PhaseStarted { phase: Phase::Work, running: true, .. }));
    }

    #[test]
    fn toggle_keeps_phase_and_remaining() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        timer.tick(timer.token());
        assert!(matches!(timer.toggle_running(), Some(Event::TimerPaused { remaining_secs: 59, .. })));
        assert_eq!(timer.phase(), Phase::Work);
        assert!(timer.tick(timer.token()).is_none());
        assert_eq!(timer.remaining_secs(), 59);
        assert!(matches!(timer.toggle_running(), Some(Event::TimerResumed { .. })));
        assert!(timer.is_running());
    }

    #[test]
    fn toggle_in_idle_is_ignored() {
        let mut timer = PhaseTimer::new(one_minute());
        assert!(timer.toggle_running().is_none());
        assert!(!timer.is_running());
    }

    #[test]
    fn stale_token_never_mutates() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        let old = timer.token();
        timer.toggle_running();
        timer.toggle_running();
        assert!(timer.tick(old).is_none());
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn work_expires_exactly_once() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        let mut expiries = 0;
        for _ in 0..120 {
            if timer.tick(timer.token()).is_some() {
                expiries += 1;
            }
        }
        assert_eq!(expiries, 1);
        assert_eq!(timer.phase(), Phase::ShortBreak);
        assert!(!timer.is_running());
    }

    #[test]
    fn ticks_at_zero_signal_once() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        timer.set_remaining_secs(0);
        let token = timer.token();
        assert!(timer.tick(token).is_some());
        assert!(timer.tick(token).is_none());
        assert!(timer.tick(timer.token()).is_none());
    }

    #[test]
    fn fourth_cycle_leads_to_long_break() {
        let mut timer = PhaseTimer::new(PomodoroSettings::default());
        timer.begin_work();
        timer.set_completed_work_cycles(3);
        timer.set_remaining_secs(1);
        let expiry = timer.tick(timer.token()).unwrap();
        assert_eq!(expiry.expired, Phase::Work);
        assert_eq!(expiry.next, Phase::LongBreak);
        assert_eq!(expiry.completed_work_cycles, 4);
        assert_eq!(timer.remaining_secs(), 20 * 60);
    }

    #[test]
    fn break_expiry_returns_to_work_without_counting() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        run_phase(&mut timer);
        timer.toggle_running();
        let expiry = run_phase(&mut timer);
        assert_eq!(expiry.expired, Phase::ShortBreak);
        assert_eq!(expiry.next, Phase::Work);
        assert_eq!(expiry.completed_work_cycles, 1);
    }

    #[test]
    fn auto_start_runs_into_next_phase() {
        let mut timer = PhaseTimer::new(one_minute()).with_auto_start(true);
        timer.begin_work();
        run_phase(&mut timer);
        assert!(timer.is_running());
        assert_eq!(timer.phase(), Phase::ShortBreak);
    }

    #[test]
    fn long_break_cadence_over_many_cycles() {
        let mut timer = PhaseTimer::new(one_minute()).with_auto_start(true);
        timer.begin_work();
        let mut breaks = Vec::new();
        while breaks.len() < 12 {
            let expiry = run_phase(&mut timer);
            if expiry.expired == Phase::Work {
                breaks.push((expiry.completed_work_cycles, expiry.next));
            }
        }
        for (cycle, next) in breaks {
            let expected = if cycle % 4 == 0 { Phase::LongBreak } else { Phase::ShortBreak };
            assert_eq!(next, expected, "after cycle {cycle}");
        }
    }

    #[test]
    fn reset_to_work_keeps_cycles() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        run_phase(&mut timer);
        timer.reset_to_work();
        assert_eq!(timer.phase(), Phase::Work);
        assert!(!timer.is_running());
        assert_eq!(timer.completed_work_cycles(), 1);
    }

    #[test]
    fn stop_goes_idle_and_invalidates_tokens() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        let token = timer.token();
        assert!(timer.stop().is_some());
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(timer.tick(token).is_none());
        assert!(timer.stop().is_none());
    }

    #[test]
    fn reset_clears_cycles_but_not_generation() {
        let mut timer = PhaseTimer::new(one_minute());
        timer.begin_work();
        run_phase(&mut timer);
        let token = timer.token();
        let generation = timer.generation();
        timer.reset();
        assert_eq!(timer.completed_work_cycles(), 0);
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(timer.generation() > generation);
        timer.begin_work();
        assert!(timer.tick(token).is_none());
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn progress_within_phase() {
        let mut timer = PhaseTimer::new(one_minute());
        assert_eq!(timer.progress(), 0.0);
        timer.begin_work();
        for _ in 0..30 {
            timer.tick(timer.token());
        }
        assert!((timer.progress() - 0.5).abs() < 1e-9);
    }
}
