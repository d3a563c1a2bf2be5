//! `wp-locations`: symbolic locations and their resolution to world points.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`graph`]    | `LocationGraph` - adjacency lists + hop-count BFS          |
//! | [`table`]    | `LocationEntry`, `LocationTable` - name → candidate points |
//! | [`resolver`] | `RouteResolver`, `ResolvedRoute`                           |
//! | [`loader`]   | `load_locations_reader`, `load_paths_reader` (+ `_csv`)    |
//! | [`error`]    | `LocationError`, `LocationResult<T>`                       |
//!
//! # Resolution model (summary)
//!
//! ```text
//! names  = BFS(graph, origin, target)          // fewest hops
//! points = for name in names:
//!            Topological      → skip
//!            Waypoint([p])    → p
//!            Waypoint([p..])  → uniform random pick
//!            (missing)        → whole resolution fails
//! ```
//!
//! Both tables are immutable once built; the resolver is shared behind an
//! `Arc` by the network thread.

pub mod error;
pub mod graph;
pub mod loader;
pub mod resolver;
pub mod table;


pub use error::{LocationError, LocationResult};
pub use graph::LocationGraph;
pub use loader::{load_locations_csv, load_locations_reader, load_paths_csv, load_paths_reader};
pub use resolver::{ResolvedRoute, RouteResolver};
pub use table::{LocationEntry, LocationTable};
