//! `wp-sim`: agent runtime for the waypoint framework.
//!
//! Ties the remote channel, the action queue, and the navigation engine into
//! one value driven by a frame tick, and loads the startup configuration.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`config`]   | `AgentConfig` (TOML), location tables inline or from CSV  |
//! | [`builder`]  | `RuntimeBuilder`                                          |
//! | [`runtime`]  | `AgentRuntime` and its tick                               |
//! | [`observer`] | `RuntimeObserver`, `NoopObserver`                         |
//! | [`error`]    | `ConfigError`, `RuntimeError` and their result aliases    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wp_mobility::KinematicBody;
//! use wp_sim::{AgentConfig, NoopObserver, RuntimeBuilder};
//!
//! let config = AgentConfig::load(Path::new("agent.toml"))?;
//! let body = KinematicBody::at(config.start_position()?);
//! let mut runtime = RuntimeBuilder::new(config, body).build()?;
//! if let Err(e) = runtime.connect() { /* logged; retry later */ }
//! loop {
//!     runtime.tick(1.0 / 60.0, &mut NoopObserver);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod runtime;


pub use builder::RuntimeBuilder;
pub use config::{AgentConfig, GridSpec, LocationSpec, NavOverrides, PathSpec};
pub use error::{ConfigError, ConfigResult, RuntimeError, RuntimeResult};
pub use observer::{NoopObserver, RuntimeObserver};
pub use runtime::AgentRuntime;
