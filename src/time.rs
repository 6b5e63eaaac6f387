//! Production tick scheduler using an accumulator pattern.
//!
//! `draw_web()` calls at ~60fps with variable delta. `TickScheduler` turns
//! those timestamps into whole production ticks (one per `interval_ms`),
//! so the engine itself never sees wall-clock time and stays testable.

use serde::Deserialize;

/// Policy for ticks that fell due while the page was suspended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissedTicks {
    /// At most one tick per wake; the backlog is discarded.
    #[default]
    Drop,
    /// Accrue up to `max_ticks` ticks per wake, discard the rest.
    CatchUp { max_ticks: u32 },
}

pub struct TickScheduler {
    interval_ms: f64,
    policy: MissedTicks,
    /// Milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Ticks handed out since creation
    pub total_ticks: u64,
    /// Ticks that fell due but were discarded by the policy
    pub dropped_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
    cancelled: bool,
}

impl TickScheduler {
    pub fn new(interval_ms: u32, policy: MissedTicks) -> Self {
        Self {
            interval_ms: interval_ms.max(1) as f64,
            policy,
            accumulator: 0.0,
            total_ticks: 0,
            dropped_ticks: 0,
            last_timestamp: None,
            cancelled: false,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the number of ticks to run now.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        if self.cancelled {
            return 0;
        }
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let due = (self.accumulator / self.interval_ms) as u64;
        if due == 0 {
            return 0;
        }
        // Every due interval is consumed; the remainder keeps the phase.
        self.accumulator -= due as f64 * self.interval_ms;

        let cap = match self.policy {
            MissedTicks::Drop => 1,
            MissedTicks::CatchUp { max_ticks } => max_ticks.max(1) as u64,
        };
        let ticks = due.min(cap);
        self.dropped_ticks += due - ticks;
        self.total_ticks += ticks;
        ticks as u32
    }

    /// Stop the scheduler for good. Returns false if it was already cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
