//! Location name → candidate world points.

use std::collections::HashMap;

use wp_core::{SimRng, WorldPoint};

use crate::{LocationError, LocationResult};

/// What a location name stands for in world space.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEntry {
    /// One or more concrete entry points; several means "pick one".
    Waypoint(Vec<WorldPoint>),
    /// A purely topological node (a corridor junction, a door between two
    /// rooms).  Skipped when a route is turned into points.
    Topological,
}

impl LocationEntry {
    /// Build from a candidate list.  An empty list is topological.
    pub fn from_points(points: Vec<WorldPoint>) -> Self {
        if points.is_empty() {
            LocationEntry::Topological
        } else {
            LocationEntry::Waypoint(points)
        }
    }

    /// The concrete point to use for this entry: the only candidate, a
    /// uniform pick among several, or `None` for topological nodes.
    pub fn pick(&self, rng: &mut SimRng) -> Option<WorldPoint> {
        match self {
            LocationEntry::Topological => None,
            LocationEntry::Waypoint(points) if points.len() == 1 => Some(points[0]),
            LocationEntry::Waypoint(points) => rng.choose(points).copied(),
        }
    }

    pub fn candidates(&self) -> &[WorldPoint] {
        match self {
            LocationEntry::Waypoint(points) => points,
            LocationEntry::Topological => &[],
        }
    }
}

/// Immutable lookup table built once at startup.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    entries: HashMap<String, LocationEntry>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, entry)` pairs, rejecting duplicate names.
    pub fn from_entries<I, S>(entries: I) -> LocationResult<Self>
    where
        I: IntoIterator<Item = (S, LocationEntry)>,
        S: Into<String>,
    {
        let mut map = HashMap::new();
        for (name, entry) in entries {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(LocationError::Duplicate { what: "location", name });
            }
            map.insert(name, entry);
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, name: &str) -> Option<&LocationEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
