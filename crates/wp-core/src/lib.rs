//! `wp-core`: foundational types for the `waypoint` agent runtime.
//!
//! This crate is a dependency of every other `wp-*` crate.  It has no `wp-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `ActionId`                                    |
//! | [`geo`]     | `WorldPoint`, `Cell`, `GridLayout`                       |
//! | [`time`]    | `Tick`, `SimClock`                                       |
//! | [`rng`]     | `SimRng` (injectable, seedable)                          |
//! | [`command`] | `CommandKind` enum                                       |
//! | [`error`]   | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod command;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use command::CommandKind;
pub use error::{CoreError, CoreResult};
pub use geo::{Cell, GridLayout, WorldPoint};
pub use ids::{ActionId, AgentId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
