//! CSV loaders for the location table and the path graph.
//!
//! # Locations
//!
//! ```csv
//! name,x,y
//! kitchen,4.5,2.0
//! hall,,
//! desk,10,3
//! desk,11,3
//! ```
//!
//! Repeated names accumulate candidate points.  A row with both coordinates
//! blank marks a topological node.  The legacy `(-1, -1)` coordinate is read
//! as topological too.
//!
//! # Paths
//!
//! ```csv
//! from,to
//! kitchen,hall
//! hall,kitchen
//! hall,desk
//! ```
//!
//! Neighbour order is the row order, which BFS relies on for tie-breaking.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use wp_core::WorldPoint;

use crate::{LocationEntry, LocationError, LocationGraph, LocationResult, LocationTable};

/// Coordinate pair that older location files used for "no point".
pub const LEGACY_TOPOLOGICAL: WorldPoint = WorldPoint { x: -1.0, y: -1.0 };

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LocationRecord {
    name: String,
    x:    Option<f32>,
    y:    Option<f32>,
}

#[derive(Deserialize)]
struct PathRecord {
    from: String,
    to:   String,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_locations_csv(path: &Path) -> LocationResult<LocationTable> {
    let file = std::fs::File::open(path)?;
    load_locations_reader(file)
}

/// Like [`load_locations_csv`] but accepts any `Read` source.
pub fn load_locations_reader<R: Read>(reader: R) -> LocationResult<LocationTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, Option<Vec<WorldPoint>>> = HashMap::new();

    for (line, result) in csv_reader.deserialize::<LocationRecord>().enumerate() {
        let row = result.map_err(|e| LocationError::Parse(e.to_string()))?;
        let name = row.name.trim().to_owned();
        if name.is_empty() {
            return Err(LocationError::Parse(format!("row {}: empty location name", line + 1)));
        }

        let point = match (row.x, row.y) {
            (None, None) => None,
            (Some(x), Some(y)) => {
                let p = WorldPoint::new(x, y);
                if p == LEGACY_TOPOLOGICAL { None } else { Some(p) }
            }
            _ => {
                return Err(LocationError::Parse(format!(
                    "row {}: location {name:?} has only one coordinate",
                    line + 1
                )));
            }
        };

        if !by_name.contains_key(&name) {
            order.push(name.clone());
        }
        let slot = by_name.entry(name.clone()).or_insert_with(|| point.map(|_| Vec::new()));
        match (slot, point) {
            (Some(points), Some(p)) => points.push(p),
            (None, None) => {}
            _ => {
                return Err(LocationError::Parse(format!(
                    "location {name:?} mixes topological and concrete rows"
                )));
            }
        }
    }

    let entries = order.into_iter().map(|name| {
        let entry = match by_name.remove(&name).flatten() {
            Some(points) => LocationEntry::from_points(points),
            None => LocationEntry::Topological,
        };
        (name, entry)
    });
    let table = LocationTable::from_entries(entries)?;
    tracing::debug!(locations = table.len(), "location table loaded");
    Ok(table)
}

pub fn load_paths_csv(path: &Path) -> LocationResult<LocationGraph> {
    let file = std::fs::File::open(path)?;
    load_paths_reader(file)
}

/// Like [`load_paths_csv`] but accepts any `Read` source.
pub fn load_paths_reader<R: Read>(reader: R) -> LocationResult<LocationGraph> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut adjacency: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in csv_reader.deserialize::<PathRecord>() {
        let row = result.map_err(|e| LocationError::Parse(e.to_string()))?;
        let from = row.from.trim().to_owned();
        let to = row.to.trim().to_owned();
        if from.is_empty() || to.is_empty() {
            return Err(LocationError::Parse("path row with an empty endpoint".into()));
        }
        match index.get(&from) {
            Some(&i) => adjacency[i].1.push(to),
            None => {
                index.insert(from.clone(), adjacency.len());
                adjacency.push((from, vec![to]));
            }
        }
    }

    let graph = LocationGraph::from_adjacency(adjacency)?;
    tracing::debug!(origins = graph.len(), "path graph loaded");
    Ok(graph)
}
