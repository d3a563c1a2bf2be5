//! `ActionItem`: one queued unit of motion or wait work.

use wp_core::{CommandKind, WorldPoint};

use crate::Completion;

#[derive(Debug)]
pub struct ActionItem {
    pub kind:    CommandKind,
    /// Single target point; `None` for waits and pointless commands.
    pub target:  Option<WorldPoint>,
    /// Duration in seconds for `waiting`, unused otherwise.
    pub cost:    f32,
    pub on_done: Option<Completion>,
}

impl ActionItem {
    pub fn new(kind: CommandKind, target: Option<WorldPoint>, cost: f32, on_done: Option<Completion>) -> Self {
        Self { kind, target, cost, on_done }
    }

    /// Fire the callback if there is one.  Intermediate waypoints have none.
    pub fn complete(self, outcome: crate::Outcome) {
        if let Some(done) = self.on_done {
            done.fire(outcome);
        }
    }
}

/// Split a multi-point command into one item per point.
///
/// Only the last item carries `on_done`, so the callback fires once, on
/// final arrival.  An empty `targets` list yields a single point-less item
/// that still carries the callback.
pub fn decompose(
    kind:    CommandKind,
    cost:    f32,
    targets: Vec<WorldPoint>,
    on_done: Option<Completion>,
) -> Vec<ActionItem> {
    if targets.is_empty() {
        return vec![ActionItem::new(kind, None, cost, on_done)];
    }

    let last = targets.len() - 1;
    let mut on_done = on_done;
    targets
        .into_iter()
        .enumerate()
        .map(|(i, point)| {
            let done = if i == last { on_done.take() } else { None };
            ActionItem::new(kind.clone(), Some(point), cost, done)
        })
        .collect()
}
