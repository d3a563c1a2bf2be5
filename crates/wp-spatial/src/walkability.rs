//! The walkability oracle and a bounded grid implementation of it.
//!
//! # Data layout
//!
//! [`ObstacleGrid`] keeps the static map obstruction as a dense row-major
//! `Vec<bool>` (one entry per in-bounds cell) and dynamic physical occupancy
//! as a sparse set, since only a handful of cells are occupied by moving
//! bodies at any time.  A cell is walkable iff it is in bounds, not a static
//! obstacle, and not occupied.

use rustc_hash::FxHashSet;

use wp_core::Cell;

/// "Is this cell traversable right now?"
///
/// Implementations must answer promptly and perform no I/O; the planners
/// call this thousands of times per search.
pub trait Walkability {
    fn is_walkable(&self, cell: Cell) -> bool;
}

impl<F> Walkability for F
where
    F: Fn(Cell) -> bool,
{
    #[inline]
    fn is_walkable(&self, cell: Cell) -> bool {
        self(cell)
    }
}

// ── ObstacleGrid ──────────────────────────────────────────────────────────────

/// A `width × height` map with cells `(0, 0) ..= (width-1, height-1)`.
/// Everything outside the bounds is non-walkable.
#[derive(Clone, Debug)]
pub struct ObstacleGrid {
    width:    u32,
    height:   u32,
    blocked:  Vec<bool>,
    occupied: FxHashSet<Cell>,
}

impl ObstacleGrid {
    /// An open grid with no obstacles.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blocked:  vec![false; width as usize * height as usize],
            occupied: FxHashSet::default(),
        }
    }

    /// Build from a list of statically blocked cells.  Out-of-bounds entries
    /// are ignored.
    pub fn with_obstacles(width: u32, height: u32, obstacles: impl IntoIterator<Item = Cell>) -> Self {
        let mut grid = Self::new(width, height);
        for cell in obstacles {
            grid.set_blocked(cell, true);
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Mark or clear a static obstacle.  Returns `false` if `cell` is out of bounds.
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.blocked[i] = blocked;
                true
            }
            None => false,
        }
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.index(cell).is_none_or(|i| self.blocked[i])
    }

    /// Mark or clear dynamic occupancy (another body standing on `cell`).
    pub fn set_occupied(&mut self, cell: Cell, occupied: bool) {
        if occupied {
            self.occupied.insert(cell);
        } else {
            self.occupied.remove(&cell);
        }
    }

    pub fn clear_occupancy(&mut self) {
        self.occupied.clear();
    }

    /// Number of statically blocked in-bounds cells.
    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }
}

impl Walkability for ObstacleGrid {
    #[inline]
    fn is_walkable(&self, cell: Cell) -> bool {
        match self.index(cell) {
            Some(i) => !self.blocked[i] && !self.occupied.contains(&cell),
            None => false,
        }
    }
}
