//! Tunables for the navigation engine.

use crate::{MobilityError, MobilityResult};

/// Movement, arrival, and recovery parameters.
///
/// Defaults reproduce the behaviour agents were tuned with: 10 world units
/// per second, a 0.2 unit arrival tolerance, replan after 0.5 s without
/// movement, relocate after 2 s.
#[derive(Clone, Debug, PartialEq)]
pub struct NavParams {
    /// World units per second.
    pub speed: f32,
    /// Minimum arrival tolerance.  The effective tolerance is
    /// `max(arrive_eps, speed * dt * 1.1)`.
    pub arrive_eps: f32,
    /// Seconds without movement before replanning.
    pub soft_stuck_secs: f32,
    /// Seconds without movement before relocating.
    pub hard_stuck_secs: f32,
    /// Manhattan radius searched when relocating a hard-stuck agent.
    pub hard_stuck_radius: u32,
    /// Manhattan radius searched when the goal cell is blocked.
    pub goal_search_radius: u32,
    /// Freeze after each arrival.
    pub settle_secs: f32,
    /// Squared per-tick displacement below which the agent counts as still.
    pub still_threshold_sq: f32,
    /// Cap on queued actions drained per tick.
    pub max_drain_per_tick: usize,
}

impl Default for NavParams {
    fn default() -> Self {
        Self {
            speed:              10.0,
            arrive_eps:         0.2,
            soft_stuck_secs:    0.5,
            hard_stuck_secs:    2.0,
            hard_stuck_radius:  2,
            goal_search_radius: 8,
            settle_secs:        3.0,
            still_threshold_sq: 1e-4,
            max_drain_per_tick: 16,
        }
    }
}

impl NavParams {
    /// Arrival tolerance for a tick lasting `dt` seconds.
    #[inline]
    pub fn snap_distance(&self, dt: f32) -> f32 {
        self.arrive_eps.max(self.speed * dt * 1.1)
    }

    /// Reject values that would stall or misdrive the engine.
    pub fn validate(&self) -> MobilityResult<()> {
        let positive = [
            ("speed", self.speed),
            ("arrive_eps", self.arrive_eps),
            ("soft_stuck_secs", self.soft_stuck_secs),
            ("hard_stuck_secs", self.hard_stuck_secs),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(MobilityError::InvalidParams(format!("{name} must be positive, got {value}")));
            }
        }
        for (name, value) in [("settle_secs", self.settle_secs), ("still_threshold_sq", self.still_threshold_sq)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MobilityError::InvalidParams(format!("{name} must be non-negative, got {value}")));
            }
        }
        if self.max_drain_per_tick == 0 {
            return Err(MobilityError::InvalidParams("max_drain_per_tick must be at least 1".into()));
        }
        Ok(())
    }
}
