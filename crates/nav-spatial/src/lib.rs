//! `nav-spatial` — tile graph, spatial indexing, and pathfinding.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`graph`]   | `TileGraph` (CSR adjacency + R-tree), `TileGraphBuilder`     |
//! | [`grid`]    | `GridBuilder`, `GridLayout` — rectangular tile grids          |
//! | [`plan`]    | `Plan` — ordered tile sequence consumed front-to-back        |
//! | [`finder`]  | `PathFinder` trait, `TilePathFinder` (random walk + A*)      |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod finder;
pub mod graph;
pub mod grid;
pub mod plan;


pub use error::{SpatialError, SpatialResult};
pub use finder::{Heuristic, PathFinder, TilePathFinder};
pub use graph::{Connectivity, TileGraph, TileGraphBuilder};
pub use grid::{GridBuilder, GridLayout};
pub use plan::Plan;
