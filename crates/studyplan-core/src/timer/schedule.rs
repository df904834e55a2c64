use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Work => "Work Session",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

/// Phase durations and long-break cadence, fixed for a session's lifetime.
///
/// Only constructed through [`PomodoroSettings::new`], so every value is
/// known to be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PomodoroSettings {
    /// Minutes.
    work_duration: u32,
    /// Minutes.
    short_break: u32,
    /// Minutes.
    long_break: u32,
    cycles_until_long_break: u32,
}

impl PomodoroSettings {
    pub fn new(
        work_duration: u32,
        short_break: u32,
        long_break: u32,
        cycles_until_long_break: u32,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("work_duration", work_duration),
            ("short_break", short_break),
            ("long_break", long_break),
            ("cycles_until_long_break", cycles_until_long_break),
        ] {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "must be greater than zero".into(),
                });
            }
        }
        Ok(Self {
            work_duration,
            short_break,
            long_break,
            cycles_until_long_break,
        })
    }

    pub fn work_duration(&self) -> u32 {
        self.work_duration
    }

    pub fn short_break(&self) -> u32 {
        self.short_break
    }

    pub fn long_break(&self) -> u32 {
        self.long_break
    }

    pub fn cycles_until_long_break(&self) -> u32 {
        self.cycles_until_long_break
    }

    /// Length of `phase` in minutes (0 for idle).
    pub fn duration_min(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Idle => 0,
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }

    /// Length of `phase` in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(&self, phase: Phase) -> u32 {
        self.duration_min(phase).saturating_mul(60)
    }

    /// Break that follows a work phase, given the cycles completed before it.
    pub fn break_after(&self, completed_work_cycles: u32) -> Phase {
        if (completed_work_cycles + 1) % self.cycles_until_long_break == 0 {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        }
    }

    /// Planned work time for the given tasks, in minutes.
    pub fn total_estimated_minutes(&self, tasks: &[Task]) -> u64 {
        tasks
            .iter()
            .map(|t| u64::from(t.estimated_work_units) * u64::from(self.work_duration))
            .sum()
    }

    /// Planned work time formatted as `"{h}h {m}m"`.
    pub fn format_estimate(&self, tasks: &[Task]) -> String {
        let total = self.total_estimated_minutes(tasks);
        format!("{}h {}m", total / 60, total % 60)
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break: 5,
            long_break: 20,
            cycles_until_long_break: 4,
        }
    }
}
