//! Motion state and the installed grid path.

use std::fmt;

use wp_core::Cell;
use wp_spatial::GridPath;

/// What the agent is doing right now.  Exactly one at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MotionState {
    /// Ready to pop the next action item.
    #[default]
    Idle,
    /// Walking a [`PathPlan`].
    PathFollowing,
    /// Standing still for a `waiting` item.
    Waiting,
    /// Holding still until a deadline (post-arrival settle).
    Frozen,
    /// Inside a portal sequence; all other transitions are suspended.
    Teleporting,
}

impl MotionState {
    /// `true` while an action item is in progress.
    pub fn is_busy(self) -> bool {
        matches!(self, MotionState::PathFollowing | MotionState::Waiting)
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MotionState::Idle => "idle",
            MotionState::PathFollowing => "path_following",
            MotionState::Waiting => "waiting",
            MotionState::Frozen => "frozen",
            MotionState::Teleporting => "teleporting",
        })
    }
}

/// Cells from the start cell to `goal` plus a cursor.
///
/// Replaced wholesale on replan, never patched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPlan {
    cells:  Vec<Cell>,
    cursor: usize,
    goal:   Cell,
}

impl PathPlan {
    /// Install `path` with the cursor on its first cell.  `goal` is the
    /// (possibly adjusted) cell the whole plan is heading for.
    pub fn new(path: GridPath, goal: Cell) -> Self {
        Self { cells: path.into_cells(), cursor: 0, goal }
    }

    /// Cell currently being walked to, or `None` once finished.
    pub fn current(&self) -> Option<Cell> {
        self.cells.get(self.cursor).copied()
    }

    /// Move the cursor on.  Returns `true` if the plan is now finished.
    pub fn advance(&mut self) -> bool {
        self.cursor += 1;
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.cells.len()
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cells left to visit, including the current one.
    pub fn remaining(&self) -> usize {
        self.cells.len().saturating_sub(self.cursor)
    }
}
