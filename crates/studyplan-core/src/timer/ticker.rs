//! Tick sources for driving a [`PhaseTimer`](super::PhaseTimer).
//!
//! Production code uses [`IntervalTicker`], backed by a tokio interval.
//! [`ImmediateTicker`] resolves at once, which lets tests run whole phases
//! without waiting on the wall clock.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Something that can wait for the next one-second tick.
pub trait Ticker: Send {
    fn tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// One tick per real second.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Must be called from within a tokio runtime.
    pub fn every_second() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        // A stalled loop should not fire a burst of catch-up ticks.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Restart the period from now, e.g. after resuming a paused timer.
    pub fn restart(&mut self) {
        self.interval.reset();
    }
}

impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker that never waits. Counts how many ticks it handed out.
#[derive(Debug, Default)]
pub struct ImmediateTicker {
    delivered: u64,
}

impl ImmediateTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl Ticker for ImmediateTicker {
    async fn tick(&mut self) {
        self.delivered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn immediate_ticker_counts() {
        let mut ticker = ImmediateTicker::new();
        for _ in 0..3 {
            ticker.tick().await;
        }
        assert_eq!(ticker.delivered(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_ticker_waits_a_full_period() {
        let mut ticker = IntervalTicker::every_second();
        let start = Instant::now();
        ticker.tick().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
