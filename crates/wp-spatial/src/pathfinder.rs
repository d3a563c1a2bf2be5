//! Path planning trait and default A* implementation.
//!
//! # Pluggability
//!
//! The navigation engine calls planning through the [`Pathfinder`] trait, so
//! a host can swap in a jump-point search or a precomputed flow field
//! without touching the state machine.  The default [`AStarPathfinder`] is
//! sufficient for tile maps of a few hundred cells per side.
//!
//! # Search model
//!
//! - 4-connected expansion in [`Cell::DIRECTIONS`] order, uniform step cost 1.
//! - Heuristic: Manhattan distance (admissible and consistent on this grid,
//!   so a cell never needs reopening once expanded).
//! - Open-set order: lowest f-score first; ties go to the cell that entered
//!   the open set earliest.  A cell keeps its original insertion sequence
//!   when its g-score later improves.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use wp_core::Cell;

use crate::{SpatialError, SpatialResult, Walkability};

// ── GridPath ──────────────────────────────────────────────────────────────────

/// The result of a planning query: every cell from start to goal, inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPath {
    cells: Vec<Cell>,
}

impl GridPath {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Number of cells, counting both endpoints.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Steps taken along the path (`len - 1`, or 0 for an empty path).
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable grid planner.
///
/// Implementations must be `Send + Sync` so one planner can be shared by
/// several engines.
pub trait Pathfinder: Send + Sync {
    /// Plan from `start` to `goal`.
    ///
    /// `start` itself is never tested for walkability (the agent is standing
    /// on it).  `start == goal` yields the single-cell path.
    fn find_path<W: Walkability + ?Sized>(
        &self,
        walkability: &W,
        start: Cell,
        goal: Cell,
    ) -> SpatialResult<GridPath>;
}

// ── AStarPathfinder ───────────────────────────────────────────────────────────

/// Expansion cap used by [`AStarPathfinder::default`].
pub const DEFAULT_MAX_EXPANSIONS: usize = 65_536;

/// A* over 4-connected cells.
///
/// `max_expansions` bounds the work done against an oracle with no natural
/// edge (e.g. an open, unbounded plane around an enclosed goal).  Reaching
/// the cap is reported as [`SpatialError::SearchLimit`].
#[derive(Debug, Clone, Copy)]
pub struct AStarPathfinder {
    pub max_expansions: usize,
}

impl AStarPathfinder {
    pub fn new(max_expansions: usize) -> Self {
        Self { max_expansions }
    }
}

impl Default for AStarPathfinder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXPANSIONS)
    }
}

impl Pathfinder for AStarPathfinder {
    fn find_path<W: Walkability + ?Sized>(
        &self,
        walkability: &W,
        start: Cell,
        goal: Cell,
    ) -> SpatialResult<GridPath> {
        astar(walkability, start, goal, self.max_expansions)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

fn astar<W: Walkability + ?Sized>(
    walkability: &W,
    start: Cell,
    goal: Cell,
    max_expansions: usize,
) -> SpatialResult<GridPath> {
    let mut g_score: FxHashMap<Cell, u32> = FxHashMap::default();
    let mut came_from: FxHashMap<Cell, Cell> = FxHashMap::default();
    // First time each cell entered the open set; the tie-breaker.
    let mut entry_seq: FxHashMap<Cell, u64> = FxHashMap::default();
    let mut closed: FxHashSet<Cell> = FxHashSet::default();
    let mut next_seq: u64 = 0;

    // Min-heap on (f, seq).  Reverse turns BinaryHeap (max) into a min-heap;
    // seq is unique so the Cell component never takes part in ordering.
    let mut open: BinaryHeap<Reverse<(u32, u64, Cell)>> = BinaryHeap::new();

    g_score.insert(start, 0);
    entry_seq.insert(start, next_seq);
    open.push(Reverse((start.manhattan(goal), next_seq, start)));
    next_seq += 1;

    let mut expansions = 0usize;

    while let Some(Reverse((f, _, cell))) = open.pop() {
        if closed.contains(&cell) {
            continue;
        }
        let g = g_score[&cell];
        // Skip stale heap entries superseded by a cheaper g-score.
        if f != g + cell.manhattan(goal) {
            continue;
        }
        if cell == goal {
            return Ok(reconstruct(&came_from, goal));
        }
        closed.insert(cell);

        expansions += 1;
        if expansions > max_expansions {
            tracing::debug!(%start, %goal, limit = max_expansions, "A* expansion cap reached");
            return Err(SpatialError::SearchLimit { start, goal, limit: max_expansions });
        }

        for next in cell.neighbors() {
            if closed.contains(&next) || !walkability.is_walkable(next) {
                continue;
            }
            let candidate = g + 1;
            if g_score.get(&next).is_none_or(|&known| candidate < known) {
                g_score.insert(next, candidate);
                came_from.insert(next, cell);
                let seq = *entry_seq.entry(next).or_insert_with(|| {
                    let s = next_seq;
                    next_seq += 1;
                    s
                });
                open.push(Reverse((candidate + next.manhattan(goal), seq, next)));
            }
        }
    }

    Err(SpatialError::Unreachable { start, goal })
}

fn reconstruct(came_from: &FxHashMap<Cell, Cell>, goal: Cell) -> GridPath {
    let mut cells = vec![goal];
    let mut cur = goal;
    while let Some(&prev) = came_from.get(&cur) {
        cells.push(prev);
        cur = prev;
    }
    cells.reverse();
    GridPath::new(cells)
}
