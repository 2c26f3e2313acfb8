//! Behavior variants as strategy objects.
//!
//! | Variant    | Strategy          | Pursuit trigger          | Pursuit goal                       | ε    |
//! |------------|-------------------|--------------------------|------------------------------------|------|
//! | `Wanderer` | [`WanderOnly`]    | never                    | —                                  | 0.05 |
//! | `Hunter`   | [`DirectPursuit`] | tracker, vision          | the target's tile                  | 0.5  |
//! | `Stalker`  | [`FlankingPursuit`] | tracker, 2 × vision    | random walkable tile next to it    | 0.5  |

use std::fmt::Debug;

use nav_core::{AgentRng, TileId, WorldPos};
use nav_spatial::{PathFinder, Plan, TileGraph};

use crate::{PerceptionTracker, TrackedTarget, TransitionSignal};

/// Which strategy an agent runs.  Fixed for the agent's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BehaviorVariant {
    #[default]
    Wanderer,
    Hunter,
    Stalker,
}

impl BehaviorVariant {
    pub const ALL: [BehaviorVariant; 3] =
        [BehaviorVariant::Wanderer, BehaviorVariant::Hunter, BehaviorVariant::Stalker];

    pub fn strategy(self) -> Box<dyn BehaviorStrategy> {
        match self {
            BehaviorVariant::Wanderer => Box::new(WanderOnly),
            BehaviorVariant::Hunter   => Box::new(DirectPursuit),
            BehaviorVariant::Stalker  => Box::new(FlankingPursuit),
        }
    }
}

/// Variant-specific decisions of the state machine.
///
/// # Thread safety
///
/// Strategies are stateless and shared by reference; all per-agent state is
/// passed in.  They must be `Send + Sync` so controllers can tick on Rayon
/// workers.
pub trait BehaviorStrategy: Send + Sync + Debug {
    /// Distance to a tile centre at which the agent counts as arrived.
    fn arrival_epsilon(&self) -> f32;

    /// Detection and chase radius for a configured vision distance.
    fn pursuit_range(&self, vision_distance: f32) -> f32 {
        vision_distance
    }

    /// A fresh plan for an idle agent with nothing left to walk.
    fn select_wander_plan(
        &self,
        finder:    &dyn PathFinder,
        graph:     &TileGraph,
        current:   TileId,
        max_steps: usize,
        rng:       &mut AgentRng,
    ) -> Plan {
        finder.random_path(graph, current, max_steps, rng)
    }

    /// Called on every arrival; decides whether to start chasing.
    fn evaluate_pursuit_trigger(
        &self,
        tracker:         &mut PerceptionTracker,
        position:        WorldPos,
        targets:         &[TrackedTarget],
        vision_distance: f32,
    ) -> TransitionSignal {
        tracker.on_arrival(position, targets, self.pursuit_range(vision_distance))
    }

    /// Goal tile for A* given the tile the target stands on.  `None` means
    /// no usable goal this tick.
    fn select_pursuit_target(
        &self,
        graph:       &TileGraph,
        target_tile: TileId,
        rng:         &mut AgentRng,
    ) -> Option<TileId>;
}

// ── Wanderer ──────────────────────────────────────────────────────────────────

/// Wanders forever; never looks for targets.
#[derive(Copy, Clone, Debug, Default)]
pub struct WanderOnly;

impl BehaviorStrategy for WanderOnly {
    fn arrival_epsilon(&self) -> f32 {
        0.05
    }

    fn evaluate_pursuit_trigger(
        &self,
        _tracker:         &mut PerceptionTracker,
        _position:        WorldPos,
        _targets:         &[TrackedTarget],
        _vision_distance: f32,
    ) -> TransitionSignal {
        TransitionSignal::ContinueWandering
    }

    fn select_pursuit_target(&self, _: &TileGraph, _: TileId, _: &mut AgentRng) -> Option<TileId> {
        None
    }
}

// ── Hunter ────────────────────────────────────────────────────────────────────

/// Heads straight for the target's tile.
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectPursuit;

impl BehaviorStrategy for DirectPursuit {
    fn arrival_epsilon(&self) -> f32 {
        0.5
    }

    fn select_pursuit_target(&self, graph: &TileGraph, target_tile: TileId, _: &mut AgentRng) -> Option<TileId> {
        graph.is_walkable(target_tile).then_some(target_tile)
    }
}

// ── Stalker ───────────────────────────────────────────────────────────────────

/// Sees twice as far and aims at a random tile next to the target, picked
/// again on every chase tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct FlankingPursuit;

impl BehaviorStrategy for FlankingPursuit {
    fn arrival_epsilon(&self) -> f32 {
        0.5
    }

    fn pursuit_range(&self, vision_distance: f32) -> f32 {
        vision_distance * 2.0
    }

    fn select_pursuit_target(&self, graph: &TileGraph, target_tile: TileId, rng: &mut AgentRng) -> Option<TileId> {
        let around: Vec<TileId> = graph.walkable_neighbors(target_tile).collect();
        rng.choose(&around).copied()
    }
}
