//! Nearest-walkable search.
//!
//! Breadth-first rings outward from a (usually blocked) query cell.  BFS
//! order guarantees the result has the minimum Manhattan ring distance; among
//! equidistant candidates the first discovered in [`Cell::DIRECTIONS`] order
//! wins, but callers must not rely on which one.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use wp_core::Cell;

use crate::Walkability;

/// The closest walkable cell to `origin` within `max_radius` (Manhattan), or
/// `None` if every cell in that diamond is blocked.
///
/// `origin` itself is returned when it is already walkable.  Blocked cells
/// inside the radius are expanded through, so the search can "see past" a
/// wall that separates `origin` from the answer.
pub fn nearest_walkable<W: Walkability + ?Sized>(
    walkability: &W,
    origin: Cell,
    max_radius: u32,
) -> Option<Cell> {
    if walkability.is_walkable(origin) {
        return Some(origin);
    }

    let mut visited: FxHashSet<Cell> = FxHashSet::default();
    let mut queue: VecDeque<Cell> = VecDeque::new();
    visited.insert(origin);
    queue.push_back(origin);

    while let Some(cur) = queue.pop_front() {
        for next in cur.neighbors() {
            if !visited.insert(next) {
                continue;
            }
            if next.manhattan(origin) > max_radius {
                continue;
            }
            if walkability.is_walkable(next) {
                return Some(next);
            }
            queue.push_back(next);
        }
    }
    None
}
