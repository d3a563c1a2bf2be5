//! The `AgentRuntime` struct and its tick.

use wp_channel::{ChannelResult, ConnectionState, RemoteChannel};
use wp_core::{AgentId, WorldPoint};
use wp_dispatch::{ActionReceiver, ActionSender};
use wp_mobility::{Body, NavHooks, NavigationEngine, NoopHooks};
use wp_spatial::{AStarPathfinder, Pathfinder, Walkability};

use crate::RuntimeObserver;

/// One agent: the remote channel feeding the action queue, and the
/// navigation engine that consumes it.
///
/// The channel's reader thread only ever touches the queue; everything else
/// happens on the thread calling [`tick`](Self::tick):
///
/// ```text
/// tick(dt):
///   ① drain ≤ max_drain_per_tick queued actions into the engine (FIFO)
///   ② engine.tick(dt)
///   ③ report drained count and any motion-state change to the observer
/// ```
///
/// Create via [`RuntimeBuilder`][crate::RuntimeBuilder].
pub struct AgentRuntime<W, B, P = AStarPathfinder, H = NoopHooks>
where
    W: Walkability,
    B: Body,
    P: Pathfinder,
    H: NavHooks,
{
    pub(crate) engine:     NavigationEngine<W, B, P, H>,
    pub(crate) actions:    ActionReceiver,
    /// Producer side kept for in-process submissions.
    pub(crate) local:      ActionSender,
    pub(crate) channel:    RemoteChannel,
    pub(crate) server_url: String,
    pub(crate) agent_id:   AgentId,
}

impl<W, B, P, H> AgentRuntime<W, B, P, H>
where
    W: Walkability,
    B: Body,
    P: Pathfinder,
    H: NavHooks,
{
    // ── Connection ────────────────────────────────────────────────────────

    /// Connect to the configured server and send `hello`.
    ///
    /// A failure is also logged; the runtime keeps ticking either way and
    /// [`retry`](Self::retry) can be called later.
    pub fn connect(&mut self) -> ChannelResult<()> {
        self.channel.connect(&self.server_url, self.agent_id.clone())
    }

    /// Reconnect if the connection is not open.
    pub fn retry(&mut self) -> ChannelResult<()> {
        self.channel.retry()
    }

    /// Close the connection and join its threads.
    pub fn shutdown(&mut self) {
        self.channel.shutdown();
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.channel.state()
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the agent by one frame of `dt` seconds.  Returns the number
    /// of queued actions applied.
    pub fn tick<O: RuntimeObserver>(&mut self, dt: f32, observer: &mut O) -> usize {
        let tick = self.engine.clock().current_tick;
        observer.on_tick_start(tick);

        let max = self.engine.params().max_drain_per_tick;
        let drained = self.actions.drain_up_to(max, &mut self.engine);
        if drained > 0 {
            tracing::debug!(%tick, drained, backlog = self.actions.len(), "actions drained");
        }

        let before = self.engine.state();
        self.engine.tick(dt);
        let after = self.engine.state();
        if before != after {
            tracing::debug!(%tick, from = %before, to = %after, "motion state changed");
            observer.on_state_change(tick, before, after);
        }

        observer.on_tick_end(tick, drained);
        drained
    }

    /// Run exactly `n` ticks of `dt` seconds each.
    pub fn run_ticks<O: RuntimeObserver>(&mut self, n: u64, dt: f32, observer: &mut O) {
        for _ in 0..n {
            self.tick(dt, observer);
        }
    }

    // ── Passthroughs ──────────────────────────────────────────────────────

    /// Pause physical work for `secs`.  See [`NavigationEngine::suspend`].
    pub fn suspend(&mut self, secs: f32) {
        self.engine.suspend(secs);
    }

    /// See [`NavigationEngine::request_teleport`].
    pub fn request_teleport(&mut self, destination: WorldPoint, pre_wait: f32, post_wait: f32) {
        self.engine.request_teleport(destination, pre_wait, post_wait);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn engine(&self) -> &NavigationEngine<W, B, P, H> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut NavigationEngine<W, B, P, H> {
        &mut self.engine
    }

    pub fn channel(&self) -> &RemoteChannel {
        &self.channel
    }

    /// Producer for actions that originate in-process rather than from the
    /// server.  Same queue, same ordering.
    pub fn actions(&self) -> &ActionSender {
        &self.local
    }

    /// Actions waiting to be drained.
    pub fn backlog(&self) -> usize {
        self.actions.len()
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }
}
