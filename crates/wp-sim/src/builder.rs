//! Fluent builder for constructing an [`AgentRuntime`].

use std::sync::Arc;

use wp_channel::{LogStatus, RemoteChannel, StatusDisplay};
use wp_core::SimRng;
use wp_dispatch::action_queue;
use wp_mobility::{Body, NavHooks, NavigationEngine, NoopHooks};
use wp_spatial::{AStarPathfinder, ObstacleGrid};

use crate::{AgentConfig, AgentRuntime, RuntimeResult};

/// Fluent builder for [`AgentRuntime`] over the configured [`ObstacleGrid`].
///
/// # Required inputs
///
/// - [`AgentConfig`]: identity, endpoint, location tables, grid, `[nav]`
/// - `B: Body`: the physics collaborator (e.g. [`wp_mobility::KinematicBody`])
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                   |
/// |-----------------|-------------------------------------------|
/// | `.hooks(h)`     | `NoopHooks`                               |
/// | `.status(s)`    | `LogStatus`                               |
/// | `.rng(r)`       | Seeded from `config.seed`, else entropy   |
///
/// # Example
///
/// ```rust,ignore
/// let config = AgentConfig::load(Path::new("agent.toml"))?;
/// let body = KinematicBody::at(config.start_position()?);
/// let mut runtime = RuntimeBuilder::new(config, body).build()?;
/// runtime.connect()?;
/// loop { runtime.tick(1.0 / 60.0, &mut NoopObserver); }
/// ```
pub struct RuntimeBuilder<B: Body, H: NavHooks = NoopHooks> {
    config: AgentConfig,
    body:   B,
    hooks:  H,
    status: Option<Arc<dyn StatusDisplay>>,
    rng:    Option<SimRng>,
}

impl<B: Body> RuntimeBuilder<B> {
    /// Create a builder with all required inputs.
    pub fn new(config: AgentConfig, body: B) -> Self {
        Self { config, body, hooks: NoopHooks, status: None, rng: None }
    }
}

impl<B: Body, H: NavHooks> RuntimeBuilder<B, H> {
    /// Install presentation hooks (work indicator, camera cut).
    pub fn hooks<H2: NavHooks>(self, hooks: H2) -> RuntimeBuilder<B, H2> {
        RuntimeBuilder {
            config: self.config,
            body:   self.body,
            hooks,
            status: self.status,
            rng:    self.rng,
        }
    }

    /// Receiver for `update_state` deltas.  Called on the network thread.
    pub fn status(mut self, status: Arc<dyn StatusDisplay>) -> Self {
        self.status = Some(status);
        self
    }

    /// Override the waypoint-candidate RNG.
    pub fn rng(mut self, rng: SimRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate the config, load the location tables, and wire the channel,
    /// queue, and engine together.  Performs no network I/O.
    pub fn build(self) -> RuntimeResult<AgentRuntime<ObstacleGrid, B, AStarPathfinder, H>> {
        let config = self.config;
        config.validate()?;
        let agent_id = config.agent_id()?;
        let resolver = Arc::new(config.route_resolver()?);
        let layout = config.layout()?;
        let params = config.nav_params()?;
        let rng = self.rng.unwrap_or_else(|| config.rng());
        let status: Arc<dyn StatusDisplay> = match self.status {
            Some(status) => status,
            None => Arc::new(LogStatus),
        };

        let (sender, actions) = action_queue();
        let channel = RemoteChannel::new(config.channel_config(), resolver, sender.clone(), status, rng);

        let engine = NavigationEngine::new(layout, config.obstacle_grid(), self.body)
            .with_params(params)?
            .with_hooks(self.hooks);

        tracing::debug!(
            agent_id = %agent_id,
            width = config.grid.width,
            height = config.grid.height,
            obstacles = config.grid.obstacles.len(),
            "runtime built"
        );

        Ok(AgentRuntime {
            engine,
            actions,
            local: sender,
            channel,
            server_url: config.server_url,
            agent_id,
        })
    }
}
