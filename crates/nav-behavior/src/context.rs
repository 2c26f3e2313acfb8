//! Read-only world state passed to every controller tick.

use nav_core::{TargetId, Tick, TileId, WorldPos};
use nav_spatial::{SpatialResult, TileGraph};

/// Something agents can detect and pursue.
///
/// Owned and updated by the host; agents only read it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackedTarget {
    pub id:       TargetId,
    pub position: WorldPos,

    /// Tile the target stands on, when the host knows it.  Otherwise the
    /// nearest walkable tile to `position` is used.
    pub tile: Option<TileId>,

    pub alive:        bool,
    pub goal_reached: bool,
}

impl TrackedTarget {
    /// A live target at `position` with no tile hint.
    pub fn new(id: TargetId, position: WorldPos) -> Self {
        Self { id, position, tile: None, alive: true, goal_reached: false }
    }

    /// A live target standing on `tile` of `graph`.
    ///
    /// # Errors
    ///
    /// [`SpatialError::TileNotFound`](nav_spatial::SpatialError::TileNotFound)
    /// if `tile` is not part of `graph`.
    pub fn on_tile(id: TargetId, graph: &TileGraph, tile: TileId) -> SpatialResult<Self> {
        let position = graph.try_pos(tile)?;
        Ok(Self { tile: Some(tile), ..Self::new(id, position) })
    }

    /// Dead or finished targets are ignored by perception and pursuit.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive && !self.goal_reached
    }

    /// The tile to path towards.
    pub fn resolve_tile(&self, graph: &TileGraph) -> Option<TileId> {
        self.tile.or_else(|| graph.nearest_walkable_tile(self.position))
    }
}

/// Global halt flags.  When either is set, controllers skip their tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldStatus {
    pub map_destroyed:    bool,
    pub session_finished: bool,
}

impl WorldStatus {
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.map_destroyed || self.session_finished
    }
}

/// Snapshot shared by all controllers during one tick.
///
/// Built once per tick by nav-sim (or the host); every borrow lives for the
/// duration of that tick only.
#[derive(Copy, Clone)]
pub struct WorldView<'a> {
    pub graph:   &'a TileGraph,
    pub targets: &'a [TrackedTarget],
    pub status:  WorldStatus,

    /// Seconds of simulated time covered by this tick.
    pub delta_secs: f32,

    pub tick: Tick,
}

impl<'a> WorldView<'a> {
    #[inline]
    pub fn new(
        graph:      &'a TileGraph,
        targets:    &'a [TrackedTarget],
        status:     WorldStatus,
        delta_secs: f32,
        tick:       Tick,
    ) -> Self {
        Self { graph, targets, status, delta_secs, tick }
    }

    /// Look up a target by id.
    pub fn target(&self, id: TargetId) -> Option<&'a TrackedTarget> {
        self.targets.iter().find(|t| t.id == id)
    }
}
