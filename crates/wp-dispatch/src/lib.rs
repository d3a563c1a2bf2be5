//! `wp-dispatch`: the hand-off between the network thread and the tick.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`outcome`]    | `Outcome`, `AbortReason`                              |
//! | [`completion`] | `Completion` (one-shot callback)                      |
//! | [`item`]       | `ActionItem`, `decompose`                             |
//! | [`navigator`]  | `Navigator` capability trait                          |
//! | [`queue`]      | `action_queue`, `ActionSender`, `ActionReceiver`      |
//!
//! # Threading
//!
//! ```text
//! network thread                          tick thread
//! ──────────────                          ───────────
//! ActionSender::enqueue(|nav| ...)  ──►   ActionReceiver::drain_up_to(16, &mut engine)
//!                                           └─ closure(&mut dyn Navigator)
//!                                                └─ Navigator::add_command(...)
//! ```
//!
//! Nothing else crosses the boundary.  Closures run on the tick thread, so
//! the navigator itself never needs to be `Sync`.

pub mod completion;
pub mod item;
pub mod navigator;
pub mod outcome;
pub mod queue;

#[cfg(test)]
mod tests;

pub use completion::Completion;
pub use item::{decompose, ActionItem};
pub use navigator::Navigator;
pub use outcome::{AbortReason, Outcome};
pub use queue::{action_queue, Action, ActionReceiver, ActionSender};
