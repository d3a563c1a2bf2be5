//! Runtime observer trait for progress reporting and tests.

use wp_core::Tick;
use wp_mobility::MotionState;

/// Callbacks invoked by [`AgentRuntime::tick`][crate::AgentRuntime::tick].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: state-change logger
///
/// ```rust,ignore
/// struct Transitions;
///
/// impl RuntimeObserver for Transitions {
///     fn on_state_change(&mut self, tick: Tick, from: MotionState, to: MotionState) {
///         println!("tick {tick}: {from} -> {to}");
///     }
/// }
/// ```
pub trait RuntimeObserver {
    /// Called at the very start of each tick, before the queue is drained.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `drained` is the number of queued actions applied this tick.
    fn on_tick_end(&mut self, _tick: Tick, _drained: usize) {}

    /// Called when the engine's motion state differs before and after the
    /// engine tick.
    fn on_state_change(&mut self, _tick: Tick, _from: MotionState, _to: MotionState) {}
}

/// A [`RuntimeObserver`] that does nothing.
pub struct NoopObserver;

impl RuntimeObserver for NoopObserver {}
