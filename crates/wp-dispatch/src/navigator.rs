//! The `Navigator` capability trait.

use wp_core::{CommandKind, WorldPoint};

use crate::Completion;

/// Accepts decoded commands on the tick thread.
///
/// The channel is constructed with an [`ActionSender`][crate::ActionSender]
/// and never sees the implementor directly; queued closures receive it as
/// `&mut dyn Navigator` when drained.
///
/// # Example
///
/// ```rust,ignore
/// sender.enqueue(move |nav: &mut dyn Navigator| {
///     nav.add_command(CommandKind::Waiting, 3.0, vec![], Some(done));
/// });
/// ```
pub trait Navigator {
    /// Queue `kind` toward `targets` in order.  `on_done` fires once, after
    /// the last target (or immediately for kinds without physical effect).
    fn add_command(
        &mut self,
        kind:    CommandKind,
        cost:    f32,
        targets: Vec<WorldPoint>,
        on_done: Option<Completion>,
    );
}
