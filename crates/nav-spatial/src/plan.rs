//! Movement plans.

use std::collections::VecDeque;

use nav_core::TileId;

/// An ordered tile sequence to walk, consumed front-to-back.
///
/// Produced by a [`PathFinder`](crate::PathFinder); every consecutive pair is
/// graph-adjacent and every tile is walkable.  An empty plan means "no
/// movement possible this cycle", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    tiles: VecDeque<TileId>,
}

impl Plan {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The next tile to walk to, without consuming it.
    #[inline]
    pub fn front(&self) -> Option<TileId> {
        self.tiles.front().copied()
    }

    /// The final tile of the plan.
    #[inline]
    pub fn last(&self) -> Option<TileId> {
        self.tiles.back().copied()
    }

    /// Consume the next tile.
    #[inline]
    pub fn pop_front(&mut self) -> Option<TileId> {
        self.tiles.pop_front()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().copied()
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn to_vec(&self) -> Vec<TileId> {
        self.tiles.iter().copied().collect()
    }
}

impl From<Vec<TileId>> for Plan {
    fn from(tiles: Vec<TileId>) -> Self {
        Self { tiles: tiles.into() }
    }
}

impl FromIterator<TileId> for Plan {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        Self { tiles: iter.into_iter().collect() }
    }
}
