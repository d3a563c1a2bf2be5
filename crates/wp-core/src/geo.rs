//! World-space points, grid cells, and the mapping between them.
//!
//! The world is a 2-D plane of `f32` coordinates.  Navigation happens on a
//! uniform square grid laid over that plane; [`GridLayout`] converts in both
//! directions the same way a tile map does (cell = floor of the scaled
//! offset, centre = cell corner + half a cell).

use std::ops::{Add, Mul, Sub};

use crate::{CoreError, CoreResult};

// ── WorldPoint ────────────────────────────────────────────────────────────────

/// A point (or displacement) in world space.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `ZERO` for a zero-length input.
    pub fn normalized(self) -> WorldPoint {
        let len = self.length();
        if len <= f32::EPSILON {
            WorldPoint::ZERO
        } else {
            WorldPoint::new(self.x / len, self.y / len)
        }
    }
}

impl Add for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn add(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn sub(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for WorldPoint {
    type Output = WorldPoint;
    #[inline]
    fn mul(self, rhs: f32) -> WorldPoint {
        WorldPoint::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// Integer coordinate of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Expansion order for every 4-connected search: up, down, left, right.
    pub const DIRECTIONS: [Cell; 4] = [
        Cell { x: 0, y: 1 },
        Cell { x: 0, y: -1 },
        Cell { x: -1, y: 0 },
        Cell { x: 1, y: 0 },
    ];

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance: the exact step count on an open 4-connected grid.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four edge-adjacent neighbours in [`DIRECTIONS`](Self::DIRECTIONS) order.
    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        Self::DIRECTIONS
            .into_iter()
            .map(move |d| Cell::new(self.x + d.x, self.y + d.y))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ── GridLayout ────────────────────────────────────────────────────────────────

/// Placement of the navigation grid in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    /// World position of the corner of cell `(0, 0)`.
    pub origin: WorldPoint,
    /// Side length of one square cell, in world units.  Always `> 0`.
    pub cell_size: f32,
}

impl GridLayout {
    pub fn new(origin: WorldPoint, cell_size: f32) -> CoreResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(CoreError::InvalidLayout(format!(
                "cell size must be a positive number, got {cell_size}"
            )));
        }
        Ok(Self { origin, cell_size })
    }

    /// Unit cells anchored at the world origin.
    pub fn unit() -> Self {
        Self { origin: WorldPoint::ZERO, cell_size: 1.0 }
    }

    /// The cell containing `p`.
    #[inline]
    pub fn world_to_cell(&self, p: WorldPoint) -> Cell {
        let local = p - self.origin;
        Cell::new(
            (local.x / self.cell_size).floor() as i32,
            (local.y / self.cell_size).floor() as i32,
        )
    }

    /// World-space centre of `cell`.
    #[inline]
    pub fn cell_center(&self, cell: Cell) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (cell.y as f32 + 0.5) * self.cell_size,
        )
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::unit()
    }
}
