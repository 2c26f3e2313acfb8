//! Tile graph representation and builder.
//!
//! # Data layout
//!
//! Adjacency is stored in **Compressed Sparse Row (CSR)** format.  Given a
//! `TileId t`, its neighbours occupy the slice:
//!
//! ```text
//! adj_to[ adj_start[t] .. adj_start[t+1] ]
//! ```
//!
//! with the matching edge costs at the same indices of `adj_cost`.  Iterating
//! a tile's neighbours is a contiguous memory scan, which keeps the A* inner
//! loop tight.  Neighbour order is the order in which edges were added.
//!
//! # Invariants
//!
//! - Adjacency is symmetric: the builder only exposes undirected `connect`.
//! - No tile lists itself, and no neighbour is listed twice.
//! - Walkability and positions are immutable once built.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps world positions to the nearest tile.  Used to
//! resolve tracked targets that only report a position.

use std::collections::HashSet;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::warn;

use nav_core::{AgentRng, TileId, WorldPos};

use crate::finder::Heuristic;
use crate::{SpatialError, SpatialResult};

// ── Connectivity ──────────────────────────────────────────────────────────────

/// Declared neighbourhood shape of a graph.  Selects the default A*
/// heuristic: Manhattan for `FourWay`, Euclidean otherwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Orthogonal neighbours only.
    FourWay,
    /// Orthogonal and diagonal neighbours.
    EightWay,
    /// Hand-built graph with no grid structure.
    #[default]
    Arbitrary,
}

// ── R-tree tile entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct TileEntry {
    point: [f32; 2],
    id:    TileId,
}

impl RTreeObject for TileEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for TileEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── TileGraph ─────────────────────────────────────────────────────────────────

/// Undirected tile graph in CSR format plus a spatial index.
///
/// Read-only after construction; share it by reference between agents.  Use
/// [`TileGraphBuilder`] or [`GridBuilder`](crate::GridBuilder) to create one.
pub struct TileGraph {
    tile_pos: Vec<WorldPos>,
    walkable: Vec<bool>,

    /// CSR row pointer, length `tile_count + 1`.
    adj_start: Vec<u32>,
    adj_to:    Vec<TileId>,
    adj_cost:  Vec<u32>,

    connectivity:    Connectivity,
    manhattan_scale: f32,
    euclidean_scale: f32,

    spatial_idx: RTree<TileEntry>,
}

impl TileGraph {
    /// A graph with no tiles.  Every query on it yields nothing.
    pub fn empty() -> Self {
        TileGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn tile_count(&self) -> usize {
        self.tile_pos.len()
    }

    /// Number of undirected adjacencies.
    pub fn edge_count(&self) -> usize {
        self.adj_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.tile_pos.is_empty()
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    // ── Tile data ─────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, tile: TileId) -> bool {
        tile.index() < self.tile_pos.len()
    }

    /// `false` for unknown tiles.
    #[inline]
    pub fn is_walkable(&self, tile: TileId) -> bool {
        self.walkable.get(tile.index()).copied().unwrap_or(false)
    }

    /// World position of `tile`.
    ///
    /// # Panics
    /// Panics if `tile` is not in the graph; use [`try_pos`](Self::try_pos)
    /// for unchecked input.
    #[inline]
    pub fn pos(&self, tile: TileId) -> WorldPos {
        self.tile_pos[tile.index()]
    }

    pub fn try_pos(&self, tile: TileId) -> SpatialResult<WorldPos> {
        self.tile_pos
            .get(tile.index())
            .copied()
            .ok_or(SpatialError::TileNotFound(tile))
    }

    /// All tiles in id order.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.tile_pos.len() as u32).map(TileId)
    }

    pub fn walkable_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles().filter(|&t| self.walkable[t.index()])
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// Neighbours of `tile` in insertion order.  Empty for unknown tiles.
    #[inline]
    pub fn neighbors(&self, tile: TileId) -> &[TileId] {
        match self.adj_range(tile) {
            Some((start, end)) => &self.adj_to[start..end],
            None => &[],
        }
    }

    /// Neighbours of `tile` paired with the cost of the connecting edge.
    #[inline]
    pub fn neighbor_costs(&self, tile: TileId) -> impl Iterator<Item = (TileId, u32)> + '_ {
        let (start, end) = self.adj_range(tile).unwrap_or((0, 0));
        self.adj_to[start..end]
            .iter()
            .copied()
            .zip(self.adj_cost[start..end].iter().copied())
    }

    pub fn walkable_neighbors(&self, tile: TileId) -> impl Iterator<Item = TileId> + '_ {
        self.neighbors(tile)
            .iter()
            .copied()
            .filter(|&t| self.walkable[t.index()])
    }

    #[inline]
    pub fn degree(&self, tile: TileId) -> usize {
        self.neighbors(tile).len()
    }

    pub fn are_adjacent(&self, a: TileId, b: TileId) -> bool {
        self.neighbors(a).contains(&b)
    }

    #[inline]
    fn adj_range(&self, tile: TileId) -> Option<(usize, usize)> {
        if !self.contains(tile) {
            return None;
        }
        let start = self.adj_start[tile.index()] as usize;
        let end   = self.adj_start[tile.index() + 1] as usize;
        Some((start, end))
    }

    // ── Heuristic support ─────────────────────────────────────────────────

    /// Cost-per-distance factor that keeps `metric` admissible on this graph.
    ///
    /// Equals the minimum over all edges of `cost / metric_length`, so
    /// `scale * metric(a, b)` never exceeds the cheapest path cost from `a`
    /// to `b` (triangle inequality).  Zero for graphs without edges.
    pub fn heuristic_scale(&self, metric: Heuristic) -> f32 {
        match metric {
            Heuristic::Manhattan => self.manhattan_scale,
            Heuristic::Euclidean => self.euclidean_scale,
            Heuristic::Zero      => 0.0,
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The tile whose position is closest to `pos`.
    ///
    /// Returns `None` only if the graph has no tiles.
    pub fn nearest_tile(&self, pos: WorldPos) -> Option<TileId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// The walkable tile closest to `pos`, if any tile is walkable.
    pub fn nearest_walkable_tile(&self, pos: WorldPos) -> Option<TileId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .map(|e| e.id)
            .find(|&t| self.walkable[t.index()])
    }

    /// Pick a uniformly random walkable tile.
    ///
    /// Samples at most `max_attempts` random tiles, then falls back to a
    /// uniform choice over the walkable set so sparse maps still succeed in
    /// bounded time.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NoWalkableTile`] if no tile is walkable.
    pub fn random_walkable_tile(
        &self,
        rng:          &mut AgentRng,
        max_attempts: usize,
    ) -> SpatialResult<TileId> {
        let n = self.tile_count();
        if n == 0 {
            return Err(SpatialError::NoWalkableTile);
        }
        for _ in 0..max_attempts {
            let tile = TileId(rng.gen_range(0..n) as u32);
            if self.walkable[tile.index()] {
                return Ok(tile);
            }
        }

        let walkable: Vec<TileId> = self.walkable_tiles().collect();
        if !walkable.is_empty() {
            warn!(
                attempts = max_attempts,
                walkable = walkable.len(),
                tiles = n,
                "random spawn sampling exhausted, choosing from walkable set"
            );
        }
        rng.choose(&walkable)
            .copied()
            .ok_or(SpatialError::NoWalkableTile)
    }
}

// ── TileGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`TileGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use nav_core::WorldPos;
/// use nav_spatial::TileGraphBuilder;
///
/// let mut b = TileGraphBuilder::new();
/// let a = b.add_tile(WorldPos::new(0.0, 0.0), true);
/// let c = b.add_tile(WorldPos::new(1.0, 0.0), true);
/// b.connect(a, c).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.tile_count(), 2);
/// assert_eq!(graph.neighbors(a), &[c]);
/// assert_eq!(graph.neighbors(c), &[a]);
/// ```
pub struct TileGraphBuilder {
    tiles:        Vec<(WorldPos, bool)>,
    raw_edges:    Vec<RawEdge>,
    seen:         HashSet<(u32, u32)>,
    connectivity: Connectivity,
}

struct RawEdge {
    from: TileId,
    to:   TileId,
    cost: u32,
}

impl TileGraphBuilder {
    pub fn new() -> Self {
        Self {
            tiles:        Vec::new(),
            raw_edges:    Vec::new(),
            seen:         HashSet::new(),
            connectivity: Connectivity::Arbitrary,
        }
    }

    /// Pre-allocate for the expected number of tiles and undirected edges.
    pub fn with_capacity(tiles: usize, edges: usize) -> Self {
        Self {
            tiles:        Vec::with_capacity(tiles),
            raw_edges:    Vec::with_capacity(edges * 2),
            seen:         HashSet::with_capacity(edges),
            connectivity: Connectivity::Arbitrary,
        }
    }

    /// Declare the neighbourhood shape (defaults to `Arbitrary`).
    pub fn connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Add a tile and return its `TileId` (sequential from 0).
    pub fn add_tile(&mut self, pos: WorldPos, walkable: bool) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push((pos, walkable));
        id
    }

    /// Connect `a` and `b` in both directions with unit cost.
    pub fn connect(&mut self, a: TileId, b: TileId) -> SpatialResult<()> {
        self.connect_weighted(a, b, 1)
    }

    /// Connect `a` and `b` in both directions with `cost` (≥ 1).
    ///
    /// Connecting an already-adjacent pair again is a no-op.
    pub fn connect_weighted(&mut self, a: TileId, b: TileId, cost: u32) -> SpatialResult<()> {
        for t in [a, b] {
            if t.index() >= self.tiles.len() {
                return Err(SpatialError::TileNotFound(t));
            }
        }
        if a == b {
            return Err(SpatialError::InvalidEdge { from: a, to: b, reason: "self-loop" });
        }
        if cost == 0 {
            return Err(SpatialError::InvalidEdge { from: a, to: b, reason: "zero cost" });
        }
        let key = (a.0.min(b.0), a.0.max(b.0));
        if !self.seen.insert(key) {
            return Ok(());
        }
        self.raw_edges.push(RawEdge { from: a, to: b, cost });
        self.raw_edges.push(RawEdge { from: b, to: a, cost });
        Ok(())
    }

    pub fn tile_count(&self) -> usize { self.tiles.len() }

    /// Consume the builder and produce a [`TileGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> TileGraph {
        let tile_count = self.tiles.len();

        // Stable sort keeps each tile's neighbours in insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let tile_pos: Vec<WorldPos> = self.tiles.iter().map(|&(p, _)| p).collect();
        let walkable: Vec<bool>     = self.tiles.iter().map(|&(_, w)| w).collect();
        let adj_to:   Vec<TileId>   = raw.iter().map(|e| e.to).collect();
        let adj_cost: Vec<u32>      = raw.iter().map(|e| e.cost).collect();

        let mut adj_start = vec![0u32; tile_count + 1];
        for e in &raw {
            adj_start[e.from.index() + 1] += 1;
        }
        for i in 1..=tile_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[tile_count] as usize, raw.len());

        let scale = |metric: Heuristic| -> f32 {
            raw.iter()
                .filter_map(|e| {
                    let len = metric.distance(tile_pos[e.from.index()], tile_pos[e.to.index()]);
                    (len > f32::EPSILON).then(|| e.cost as f32 / len)
                })
                .fold(None, |acc: Option<f32>, r| Some(acc.map_or(r, |a| a.min(r))))
                .unwrap_or(0.0)
        };
        let manhattan_scale = scale(Heuristic::Manhattan);
        let euclidean_scale = scale(Heuristic::Euclidean);

        let entries: Vec<TileEntry> = tile_pos
            .iter()
            .enumerate()
            .map(|(i, p)| TileEntry { point: [p.x, p.y], id: TileId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        TileGraph {
            tile_pos,
            walkable,
            adj_start,
            adj_to,
            adj_cost,
            connectivity: self.connectivity,
            manhattan_scale,
            euclidean_scale,
            spatial_idx,
        }
    }
}

impl Default for TileGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
