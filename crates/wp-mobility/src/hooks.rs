//! Presentation collaborators the engine signals but does not own.

/// Callbacks into the host's presentation layer.
///
/// All methods have no-op defaults; override only what you need.
pub trait NavHooks {
    /// A `waiting` item started; `secs` is its duration.
    fn work_started(&mut self, _secs: f32) {}

    /// The current `waiting` item ended (ran out or was interrupted).
    fn work_stopped(&mut self) {}

    /// The agent was relocated instantly; any camera smoothing state is stale.
    fn camera_cut(&mut self) {}
}

/// A [`NavHooks`] that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopHooks;

impl NavHooks for NoopHooks {}
