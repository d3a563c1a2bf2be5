use std::fmt;

/// Why the engine gave up on an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AbortReason {
    /// Goal cell blocked and nothing walkable within the goal search radius.
    NoWalkableGoal,
    /// A* found no path (or hit its expansion limit).
    NoPath,
    /// Hard-stuck recovery found no walkable cell to relocate to.
    Stuck,
}

/// How an action item ended.  Passed to its [`Completion`][crate::Completion].
///
/// Every variant is a completion from the controller's point of view; the
/// distinction exists for logging and tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Final waypoint of a `go_to` reached.
    Arrived,
    /// A `waiting` item ran its full duration.
    Waited,
    /// Kind with no physical effect, or dropped during a suspend cooldown.
    Skipped,
    /// Discharged by a manual suspend or a teleport.
    Interrupted,
    /// Unreachable target; the queue moved on.
    Aborted(AbortReason),
}

impl Outcome {
    pub fn is_aborted(self) -> bool {
        matches!(self, Outcome::Aborted(_))
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AbortReason::NoWalkableGoal => "no walkable goal",
            AbortReason::NoPath => "no path",
            AbortReason::Stuck => "stuck",
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Arrived => f.write_str("arrived"),
            Outcome::Waited => f.write_str("waited"),
            Outcome::Skipped => f.write_str("skipped"),
            Outcome::Interrupted => f.write_str("interrupted"),
            Outcome::Aborted(reason) => write!(f, "aborted ({reason})"),
        }
    }
}
