//! Route resolution: symbolic origin/target → ordered world points.

use wp_core::{SimRng, WorldPoint};

use crate::{LocationError, LocationGraph, LocationResult, LocationTable};

/// Output of [`RouteResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    /// Location names from origin to target, inclusive.
    pub names: Vec<String>,
    /// One concrete point per non-topological name, in route order.  Never
    /// empty.
    pub points: Vec<WorldPoint>,
}

/// Graph + table, validated against each other at construction.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    graph: LocationGraph,
    table: LocationTable,
}

impl RouteResolver {
    /// Pair a graph with its table.
    ///
    /// # Errors
    ///
    /// [`LocationError::UnknownLocation`] for the first graph name missing
    /// from the table.  Checking here turns a latent "every route through X
    /// fails" into a startup failure.
    pub fn new(graph: LocationGraph, table: LocationTable) -> LocationResult<Self> {
        let mut missing: Vec<&str> = graph
            .referenced_names()
            .into_iter()
            .filter(|name| !table.contains(name))
            .collect();
        missing.sort_unstable();
        if let Some(name) = missing.first() {
            return Err(LocationError::UnknownLocation((*name).to_owned()));
        }
        Ok(Self { graph, table })
    }

    pub fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    pub fn table(&self) -> &LocationTable {
        &self.table
    }

    /// Resolve the route from `origin` to `target`.
    ///
    /// `rng` breaks ties between multiple candidate points of one location.
    pub fn resolve(&self, origin: &str, target: &str, rng: &mut SimRng) -> LocationResult<ResolvedRoute> {
        let names = self.graph.shortest_hops(origin, target).ok_or_else(|| {
            LocationError::NoRoute { from: origin.to_owned(), to: target.to_owned() }
        })?;

        let mut points = Vec::with_capacity(names.len());
        for name in &names {
            let entry = self
                .table
                .get(name)
                .ok_or_else(|| LocationError::UnknownLocation(name.clone()))?;
            if let Some(point) = entry.pick(rng) {
                points.push(point);
            }
        }

        if points.is_empty() {
            return Err(LocationError::NoConcretePoint {
                from: origin.to_owned(),
                to:   target.to_owned(),
            });
        }

        tracing::debug!(origin, target, hops = names.len() - 1, points = points.len(), "route resolved");
        Ok(ResolvedRoute { names, points })
    }
}
