//! Spatial-subsystem error type.
//!
//! Missing paths are not errors here: pathfinding reports them as an empty
//! [`Plan`](crate::Plan).  Only structural problems surface as `SpatialError`.

use thiserror::Error;

use nav_core::TileId;

/// Errors produced by `nav-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("tile {0} not found in graph")]
    TileNotFound(TileId),

    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from:   TileId,
        to:     TileId,
        reason: &'static str,
    },

    #[error("graph has no walkable tile")]
    NoWalkableTile,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
