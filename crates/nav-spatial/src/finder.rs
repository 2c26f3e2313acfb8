//! Pathfinding trait and default random-walk / A* implementation.
//!
//! # Pluggability
//!
//! Behavior controllers request plans through the [`PathFinder`] trait, so
//! applications can swap in other engines (jump point search, flow fields,
//! cached corridors) without touching the state machine.
//!
//! # Failure model
//!
//! Neither query fails.  "No path right now" is routine and is reported as an
//! empty [`Plan`]; callers hold position and retry on a later tick.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use nav_core::{AgentRng, TileId, WorldPos};

use crate::graph::TileGraph;
use crate::Plan;

// ── Heuristic ─────────────────────────────────────────────────────────────────

/// Distance metric used for the A* estimate.
///
/// The graph scales the metric so it never overestimates the remaining cost
/// (see [`TileGraph::heuristic_scale`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// L1 distance.  Tightest admissible choice on 4-connected grids.
    Manhattan,
    /// Straight-line distance.  Admissible on any geometry.
    Euclidean,
    /// No estimate; A* degenerates to uniform-cost search.
    Zero,
}

impl Heuristic {
    /// Default metric for a declared connectivity.
    pub fn for_connectivity(connectivity: crate::Connectivity) -> Self {
        match connectivity {
            crate::Connectivity::FourWay => Heuristic::Manhattan,
            _ => Heuristic::Euclidean,
        }
    }

    #[inline]
    pub fn distance(self, a: WorldPos, b: WorldPos) -> f32 {
        match self {
            Heuristic::Manhattan => a.manhattan(b),
            Heuristic::Euclidean => a.distance(b),
            Heuristic::Zero      => 0.0,
        }
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable plan producer.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one instance is shared by every
/// agent and may be queried from several Rayon workers in the same tick.
/// Randomness comes from the caller's agent-local RNG.
pub trait PathFinder: Send + Sync {
    /// Randomised exploratory walk of at most `max_steps` tiles from `start`
    /// (exclusive).
    fn random_path(
        &self,
        graph:     &TileGraph,
        start:     TileId,
        max_steps: usize,
        rng:       &mut AgentRng,
    ) -> Plan;

    /// Shortest path from `start` (exclusive) to `goal` (inclusive).
    ///
    /// Empty when `start == goal` or when no path exists.
    fn astar_path(&self, graph: &TileGraph, start: TileId, goal: TileId) -> Plan;
}

// ── TilePathFinder ────────────────────────────────────────────────────────────

/// Default engine: uniform random walk with backtrack avoidance, and A* with
/// stable FIFO tie-breaking.
///
/// | Setting            | Default                                        |
/// |--------------------|------------------------------------------------|
/// | heuristic          | Manhattan on `FourWay` graphs, Euclidean else  |
/// | max expansions     | unbounded (graph size bounds the search)       |
#[derive(Clone, Debug, Default)]
pub struct TilePathFinder {
    heuristic:      Option<Heuristic>,
    max_expansions: Option<usize>,
}

impl TilePathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a metric instead of deriving it from the graph's connectivity.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    /// Abandon an A* query (empty plan) after `limit` tile expansions.
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    fn metric_for(&self, graph: &TileGraph) -> Heuristic {
        self.heuristic
            .unwrap_or_else(|| Heuristic::for_connectivity(graph.connectivity()))
    }
}

impl PathFinder for TilePathFinder {
    fn random_path(
        &self,
        graph:     &TileGraph,
        start:     TileId,
        max_steps: usize,
        rng:       &mut AgentRng,
    ) -> Plan {
        random_walk(graph, start, max_steps, rng)
    }

    fn astar_path(&self, graph: &TileGraph, start: TileId, goal: TileId) -> Plan {
        astar(graph, start, goal, self.metric_for(graph), self.max_expansions)
    }
}

// ── Random walk ───────────────────────────────────────────────────────────────

fn random_walk(graph: &TileGraph, start: TileId, max_steps: usize, rng: &mut AgentRng) -> Plan {
    let mut tiles = Vec::with_capacity(max_steps.min(64));
    if !graph.is_walkable(start) {
        return Plan::empty();
    }

    let mut previous: Option<TileId> = None;
    let mut current = start;
    let mut candidates: Vec<TileId> = Vec::with_capacity(8);

    for _ in 0..max_steps {
        candidates.clear();
        candidates.extend(
            graph
                .walkable_neighbors(current)
                .filter(|&t| Some(t) != previous),
        );

        // Dead end: stepping back is the only move left.
        let next = match rng.choose(&candidates) {
            Some(&t) => t,
            None => match previous {
                Some(p) => p,
                None => break,
            },
        };

        tiles.push(next);
        previous = Some(current);
        current = next;
    }

    Plan::from(tiles)
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Open-set entry.  Ordered so `BinaryHeap` pops the lowest `f` first and,
/// among equal `f`, the earliest inserted.
struct OpenEntry {
    f:    f32,
    seq:  u64,
    tile: TileId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn astar(
    graph:          &TileGraph,
    start:          TileId,
    goal:           TileId,
    metric:         Heuristic,
    max_expansions: Option<usize>,
) -> Plan {
    if start == goal || !graph.is_walkable(start) || !graph.is_walkable(goal) {
        return Plan::empty();
    }

    let n = graph.tile_count();
    let scale    = graph.heuristic_scale(metric);
    let goal_pos = graph.pos(goal);
    let estimate = |t: TileId| scale * metric.distance(graph.pos(t), goal_pos);

    // g[t] = best known cost from start; came_from[t] = predecessor on that path.
    let mut g         = vec![u32::MAX; n];
    let mut came_from = vec![TileId::INVALID; n];
    let mut closed    = vec![false; n];

    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut expansions: usize = 0;

    g[start.index()] = 0;
    open.push(OpenEntry { f: estimate(start), seq, tile: start });

    while let Some(OpenEntry { tile, .. }) = open.pop() {
        if closed[tile.index()] {
            continue;
        }
        if tile == goal {
            return reconstruct(&came_from, start, goal);
        }
        closed[tile.index()] = true;

        expansions += 1;
        if max_expansions.is_some_and(|cap| expansions > cap) {
            debug!(%start, %goal, expansions, "A* expansion cap reached");
            return Plan::empty();
        }

        let g_here = g[tile.index()];
        for (next, cost) in graph.neighbor_costs(tile) {
            if closed[next.index()] || !graph.is_walkable(next) {
                continue;
            }
            let tentative = g_here.saturating_add(cost);
            if tentative < g[next.index()] {
                g[next.index()] = tentative;
                came_from[next.index()] = tile;
                seq += 1;
                open.push(OpenEntry { f: tentative as f32 + estimate(next), seq, tile: next });
            }
        }
    }

    Plan::empty()
}

fn reconstruct(came_from: &[TileId], start: TileId, goal: TileId) -> Plan {
    let mut tiles = Vec::new();
    let mut cur = goal;
    while cur != start {
        tiles.push(cur);
        cur = came_from[cur.index()];
    }
    tiles.reverse();
    Plan::from(tiles)
}
