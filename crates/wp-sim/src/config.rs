//! Startup configuration: one TOML file describing the connection, the
//! location tables, the navigation grid, and parameter overrides.
//!
//! ```toml
//! server_url   = "tcp://127.0.0.1:9876"
//! agent_id     = "courier-1"
//! seed         = 7
//! capabilities = ["waiting"]
//! start        = { x = 1.5, y = 1.5 }
//!
//! [[locations]]
//! name   = "home"
//! points = [{ x = 1.5, y = 1.5 }]
//!
//! [[locations]]
//! name = "corridor"          # no points: topological only
//!
//! [[paths]]
//! from = "home"
//! to   = ["corridor"]
//!
//! [grid]
//! origin    = { x = 0.0, y = 0.0 }
//! cell_size = 1.0
//! width     = 32
//! height    = 32
//! obstacles = [{ x = 4, y = 4 }]
//!
//! [nav]
//! speed       = 6.0
//! settle_secs = 1.0
//! ```
//!
//! Either table may come from CSV instead (`locations_csv`, `paths_csv`);
//! relative paths are taken from the config file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use wp_channel::{parse_endpoint, ChannelConfig};
use wp_core::{AgentId, Cell, GridLayout, SimRng, WorldPoint};
use wp_locations::{
    load_locations_csv, load_paths_csv, LocationEntry, LocationGraph, LocationTable, RouteResolver,
};
use wp_mobility::NavParams;
use wp_spatial::ObstacleGrid;

use crate::{ConfigError, ConfigResult};

// ── AgentConfig ───────────────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// `tcp://host:port` or `host:port`.
    pub server_url: String,
    pub agent_id:   String,
    /// Seeds waypoint-candidate choice.  Drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
    /// Initial body position.  Defaults to the center of cell (0, 0).
    #[serde(default)]
    pub start: Option<WorldPoint>,

    #[serde(default)]
    pub locations:     Vec<LocationSpec>,
    #[serde(default)]
    pub paths:         Vec<PathSpec>,
    #[serde(default)]
    pub locations_csv: Option<PathBuf>,
    #[serde(default)]
    pub paths_csv:     Option<PathBuf>,

    #[serde(default)]
    pub grid: GridSpec,
    #[serde(default)]
    pub nav:  NavOverrides,

    /// Directory relative CSV paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_capabilities() -> Vec<String> {
    ChannelConfig::default().capabilities
}

/// One `[[locations]]` entry.  No points means a topological waypoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationSpec {
    pub name: String,
    #[serde(default)]
    pub points: Vec<WorldPoint>,
}

/// One `[[paths]]` entry.  Neighbor order is kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSpec {
    pub from: String,
    #[serde(default)]
    pub to:   Vec<String>,
}

/// `[grid]`: navigation grid placement, bounds, and static obstacles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSpec {
    pub origin:    WorldPoint,
    pub cell_size: f32,
    pub width:     u32,
    pub height:    u32,
    pub obstacles: Vec<Cell>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            origin:    WorldPoint::ZERO,
            cell_size: 1.0,
            width:     64,
            height:    64,
            obstacles: Vec::new(),
        }
    }
}

/// `[nav]`: per-field overrides of [`NavParams`] defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavOverrides {
    pub speed:              Option<f32>,
    pub arrive_eps:         Option<f32>,
    pub soft_stuck_secs:    Option<f32>,
    pub hard_stuck_secs:    Option<f32>,
    pub hard_stuck_radius:  Option<u32>,
    pub goal_search_radius: Option<u32>,
    pub settle_secs:        Option<f32>,
    pub still_threshold_sq: Option<f32>,
    pub max_drain_per_tick: Option<usize>,
}

impl NavOverrides {
    /// Defaults with every set field replaced.
    pub fn apply(&self, base: NavParams) -> NavParams {
        NavParams {
            speed:              self.speed.unwrap_or(base.speed),
            arrive_eps:         self.arrive_eps.unwrap_or(base.arrive_eps),
            soft_stuck_secs:    self.soft_stuck_secs.unwrap_or(base.soft_stuck_secs),
            hard_stuck_secs:    self.hard_stuck_secs.unwrap_or(base.hard_stuck_secs),
            hard_stuck_radius:  self.hard_stuck_radius.unwrap_or(base.hard_stuck_radius),
            goal_search_radius: self.goal_search_radius.unwrap_or(base.goal_search_radius),
            settle_secs:        self.settle_secs.unwrap_or(base.settle_secs),
            still_threshold_sq: self.still_threshold_sq.unwrap_or(base.still_threshold_sq),
            max_drain_per_tick: self.max_drain_per_tick.unwrap_or(base.max_drain_per_tick),
        }
    }
}

impl AgentConfig {
    // ── Loading ───────────────────────────────────────────────────────────

    /// Read, parse, and validate the file at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        let mut config: Self = toml::from_str(&contents)?;
        config.base_dir = path.parent().map(Path::to_owned);
        config.validate()?;
        tracing::info!(path = %path.display(), agent_id = %config.agent_id, "config loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.  Relative CSV paths resolve against the
    /// working directory.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that can be checked before connecting: identity,
    /// endpoint, grid, parameters, and the location tables against each
    /// other.
    pub fn validate(&self) -> ConfigResult<()> {
        self.agent_id()?;
        parse_endpoint(&self.server_url)?;
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "[grid] must be at least 1x1, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }
        self.layout()?;
        self.nav_params()?;
        self.route_resolver()?;
        Ok(())
    }

    // ── Derived values ────────────────────────────────────────────────────

    pub fn agent_id(&self) -> ConfigResult<AgentId> {
        Ok(AgentId::parse(&self.agent_id)?)
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig { capabilities: self.capabilities.clone(), ..ChannelConfig::default() }
    }

    pub fn rng(&self) -> SimRng {
        SimRng::from_seed_option(self.seed)
    }

    pub fn layout(&self) -> ConfigResult<GridLayout> {
        Ok(GridLayout::new(self.grid.origin, self.grid.cell_size)?)
    }

    pub fn obstacle_grid(&self) -> ObstacleGrid {
        ObstacleGrid::with_obstacles(self.grid.width, self.grid.height, self.grid.obstacles.iter().copied())
    }

    /// Configured start, or the center of cell (0, 0).
    pub fn start_position(&self) -> ConfigResult<WorldPoint> {
        match self.start {
            Some(p) => Ok(p),
            None => Ok(self.layout()?.cell_center(Cell::new(0, 0))),
        }
    }

    pub fn nav_params(&self) -> ConfigResult<NavParams> {
        let params = self.nav.apply(NavParams::default());
        params.validate()?;
        Ok(params)
    }

    /// Build the location graph and table from inline entries or CSV.
    pub fn route_resolver(&self) -> ConfigResult<RouteResolver> {
        let table = match (&self.locations_csv, self.locations.is_empty()) {
            (Some(_), false) => {
                return Err(ConfigError::Invalid("set either [[locations]] or locations_csv, not both".into()));
            }
            (Some(path), true) => load_locations_csv(&self.resolve_path(path))?,
            (None, _) => LocationTable::from_entries(
                self.locations
                    .iter()
                    .map(|l| (l.name.clone(), LocationEntry::from_points(l.points.clone()))),
            )?,
        };
        let graph = match (&self.paths_csv, self.paths.is_empty()) {
            (Some(_), false) => {
                return Err(ConfigError::Invalid("set either [[paths]] or paths_csv, not both".into()));
            }
            (Some(path), true) => load_paths_csv(&self.resolve_path(path))?,
            (None, _) => LocationGraph::from_adjacency(self.paths.iter().map(|p| (p.from.clone(), p.to.clone())))?,
        };
        Ok(RouteResolver::new(graph, table)?)
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_owned(),
        }
    }
}
