//! Simulation time model.
//!
//! The navigation engine is driven by a variable-length frame tick.  Two
//! counters are kept side by side:
//!
//! - `Tick`: how many frames have been processed.  Exact; used for logging
//!   and observer callbacks.
//! - `elapsed_secs`: accumulated frame durations.  Every timer in the
//!   engine (settle, teleport waits, suspend cooldown) is a deadline on this
//!   axis, so timers advance only when the tick advances.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute frame counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Frame counter plus accumulated simulated seconds.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    /// The current tick: advanced by [`SimClock::advance`] each frame.
    pub current_tick: Tick,
    /// Simulated seconds since tick 0.
    pub elapsed_secs: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame lasting `dt` seconds.  Negative durations are
    /// treated as zero so time never runs backwards.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.current_tick = self.current_tick + 1;
        self.elapsed_secs += f64::from(dt.max(0.0));
    }

    /// Current simulated time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.elapsed_secs
    }

    /// Absolute deadline `secs` seconds from now.
    #[inline]
    pub fn deadline_after(&self, secs: f32) -> f64 {
        self.elapsed_secs + f64::from(secs.max(0.0))
    }

    /// `true` once simulated time has reached `deadline`.
    #[inline]
    pub fn reached(&self, deadline: f64) -> bool {
        self.elapsed_secs >= deadline
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3}s)", self.current_tick, self.elapsed_secs)
    }
}
