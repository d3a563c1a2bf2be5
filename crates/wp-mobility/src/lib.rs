//! `wp-mobility`: the navigation engine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                       |
//! |------------|----------------------------------------------------------------|
//! | [`state`]  | `MotionState`, `PathPlan`                                      |
//! | [`params`] | `NavParams` - speeds, tolerances, stuck thresholds, radii      |
//! | [`body`]   | `Body` collaborator trait, `KinematicBody`                     |
//! | [`hooks`]  | `NavHooks` (work indicator, camera cut), `NoopHooks`           |
//! | [`engine`] | `NavigationEngine<W, B, P, H>` - per-tick state machine        |
//! | [`error`]  | `MobilityError`, `MobilityResult<T>`                           |
//!
//! # Tick order
//!
//! ```text
//! tick(dt):
//!   1. clock += dt; expire teleport phases, settle freeze, suspend cooldown
//!   2. Frozen / Teleporting → hold still, stop
//!   3. Idle → pop one ActionItem (go_to / waiting / other)
//!   4. PathFollowing → stuck check, then steer or snap-and-advance
//!      Waiting       → remaining -= dt
//!   5. body.step(dt)
//! ```
//!
//! Every abort path ends in `Idle` with the item's callback fired, so the
//! queue never stalls on an unreachable target.

pub mod body;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod params;
pub mod state;


pub use body::{Body, KinematicBody};
pub use engine::NavigationEngine;
pub use error::{MobilityError, MobilityResult};
pub use hooks::{NavHooks, NoopHooks};
pub use params::NavParams;
pub use state::{MotionState, PathPlan};
