use nav_core::TileId;
use nav_mobility::MobilityError;
use nav_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error("cannot place agent: {0}")]
    Spawn(#[from] SpatialError),

    #[error("tile {0} is not walkable")]
    NotWalkable(TileId),

    #[error(transparent)]
    Mobility(#[from] MobilityError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
