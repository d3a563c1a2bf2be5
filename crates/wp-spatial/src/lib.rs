//! `wp-spatial`: grid walkability, path planning, and walkable-cell search.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`walkability`] | `Walkability` oracle trait, `ObstacleGrid`                |
//! | [`pathfinder`]  | `Pathfinder` trait, `GridPath`, `AStarPathfinder`         |
//! | [`nearest`]     | `nearest_walkable` ring-BFS                               |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                        |
//!
//! The walkability oracle is treated as a pure function for the duration of
//! one planning call: nothing here caches its answers across calls, so a
//! replan always sees the current obstruction picture.

pub mod error;
pub mod nearest;
pub mod pathfinder;
pub mod walkability;


pub use error::{SpatialError, SpatialResult};
pub use nearest::nearest_walkable;
pub use pathfinder::{AStarPathfinder, GridPath, Pathfinder};
pub use walkability::{ObstacleGrid, Walkability};
