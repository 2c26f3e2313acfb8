//! The per-agent wander/chase state machine.
//!
//! ```text
//!            plan empty → random walk
//!  ┌─────────┐  head of plan   ┌────────┐
//!  │ Default │ ──────────────▶ │ Moving │ ─┐ not yet within ε
//!  └─────────┘                 └────────┘ ◀┘
//!       ▲   arrived, keep wandering │  │ arrived, tracker says Pursue
//!       └───────────────────────────┘  ▼
//!                                 ┌───────┐  target gone / out of range:
//!        A* towards target ◀───── │ Chase │  hold (or wander)
//!        head → Moving            └───────┘
//! ```
//!
//! A chase that yields no path (walled-off target, already standing on the
//! goal) drops the target and falls back to `Default`.  `Rest` and `Static`
//! fall back to `Default` on the next tick.

use tracing::{debug, info};

use nav_core::{AgentId, AgentRng, TargetId, TileId, WorldPos};
use nav_mobility::{Kinematics, MovementState, StepOutcome};
use nav_spatial::{PathFinder, Plan, TileGraph};

use crate::{
    AgentConfig, AgentState, BehaviorError, BehaviorResult, BehaviorStrategy, BehaviorVariant,
    ChaseLostPolicy, PerceptionTracker, TransitionSignal, WorldView,
};

/// Random samples tried before [`reset`](BehaviorController::reset) falls
/// back to scanning the walkable set.
pub const MAX_SPAWN_ATTEMPTS: usize = 64;

/// What happened during one [`tick`](BehaviorController::tick).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub agent: AgentId,
    pub from:  AgentState,
    pub to:    AgentState,

    /// The tile reached this tick, if any.
    pub arrived: Option<TileId>,
}

impl TickReport {
    #[inline]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// One agent: its plan, tiles, FSM state, perception and motion.
///
/// Created unplaced; call [`reset`](Self::reset) or [`place`](Self::place)
/// before the first tick.  An unplaced controller idles in `Default`.
pub struct BehaviorController {
    id:         AgentId,
    config:     AgentConfig,
    strategy:   Box<dyn BehaviorStrategy>,
    kinematics: Kinematics,
    tracker:    PerceptionTracker,
    rng:        AgentRng,

    motion:       MovementState,
    current_tile: TileId,
    target_tile:  Option<TileId>,
    plan:         Plan,
    state:        AgentState,
    detected:     Option<TargetId>,
}

impl BehaviorController {
    /// Validate `config` and build an unplaced controller whose RNG is
    /// derived from `seed` and `id`.
    pub fn new(id: AgentId, config: AgentConfig, seed: u64) -> BehaviorResult<Self> {
        config.validate()?;
        let strategy   = config.variant.strategy();
        let kinematics = Kinematics::new(config.speed, strategy.arrival_epsilon())?;
        Ok(Self {
            id,
            tracker: PerceptionTracker::new(config.max_counter),
            config,
            strategy,
            kinematics,
            rng: AgentRng::new(seed, id),
            motion:       MovementState::default(),
            current_tile: TileId::INVALID,
            target_tile:  None,
            plan:         Plan::empty(),
            state:        AgentState::Default,
            detected:     None,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId                     { self.id }
    pub fn config(&self) -> &AgentConfig            { &self.config }
    pub fn variant(&self) -> BehaviorVariant        { self.config.variant }
    pub fn kinematics(&self) -> &Kinematics         { &self.kinematics }
    pub fn tracker(&self) -> &PerceptionTracker     { &self.tracker }
    pub fn state(&self) -> AgentState               { self.state }
    pub fn current_tile(&self) -> TileId            { self.current_tile }
    pub fn target_tile(&self) -> Option<TileId>     { self.target_tile }
    pub fn plan(&self) -> &Plan                     { &self.plan }
    pub fn position(&self) -> WorldPos              { self.motion.position }
    pub fn velocity(&self) -> WorldPos              { self.motion.velocity }
    pub fn detected_target(&self) -> Option<TargetId> { self.detected }

    /// Detection radius after the strategy's scaling.
    pub fn pursuit_range(&self) -> f32 {
        self.strategy.pursuit_range(self.config.vision_distance)
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Respawn on a random walkable tile with a clean slate.
    ///
    /// # Errors
    ///
    /// [`BehaviorError::Spawn`] if `graph` has no walkable tile.
    pub fn reset(&mut self, graph: &TileGraph) -> BehaviorResult<()> {
        self.plan.clear();
        let tile = graph.random_walkable_tile(&mut self.rng, MAX_SPAWN_ATTEMPTS)?;
        self.place(graph, tile)?;
        info!(agent = %self.id, %tile, variant = ?self.config.variant, "agent reset");
        Ok(())
    }

    /// Put the agent on `tile` with a clean slate.
    pub fn place(&mut self, graph: &TileGraph, tile: TileId) -> BehaviorResult<()> {
        let pos = graph.try_pos(tile)?;
        if !graph.is_walkable(tile) {
            return Err(BehaviorError::NotWalkable(tile));
        }
        self.motion.place(pos);
        self.current_tile = tile;
        self.target_tile  = None;
        self.plan.clear();
        self.state    = AgentState::Default;
        self.detected = None;
        self.tracker.reset();
        Ok(())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the state machine by one tick.
    ///
    /// Does nothing while the world is halted.
    pub fn tick<P: PathFinder>(&mut self, world: &WorldView<'_>, finder: &P) -> TickReport {
        let from = self.state;
        let mut arrived = None;

        if !world.status.is_halted() {
            match self.state {
                AgentState::Default => self.tick_default(world.graph, finder),
                AgentState::Moving  => arrived = self.tick_moving(world),
                AgentState::Chase   => self.tick_chase(world, finder),
                AgentState::Rest | AgentState::Static => self.state = AgentState::Default,
            }
        }

        if self.state != from {
            debug!(agent = %self.id, tick = %world.tick, %from, to = %self.state, "state transition");
        }
        TickReport { agent: self.id, from, to: self.state, arrived }
    }

    fn tick_default(&mut self, graph: &TileGraph, finder: &dyn PathFinder) {
        if self.plan.is_empty() {
            self.plan = self.strategy.select_wander_plan(
                finder,
                graph,
                self.current_tile,
                self.config.max_random_steps,
                &mut self.rng,
            );
        }
        if let Some(next) = self.plan.pop_front() {
            self.target_tile = Some(next);
            self.state = AgentState::Moving;
        }
    }

    fn tick_moving(&mut self, world: &WorldView<'_>) -> Option<TileId> {
        let Some(target) = self.target_tile else {
            self.state = AgentState::Default;
            return None;
        };
        let Ok(target_pos) = world.graph.try_pos(target) else {
            self.target_tile = None;
            self.motion.stop();
            self.state = AgentState::Default;
            return None;
        };

        match self.kinematics.advance(&mut self.motion, target_pos, world.delta_secs) {
            StepOutcome::Moving => None,
            StepOutcome::Arrived => {
                self.current_tile = target;
                self.target_tile  = None;
                let signal = self.strategy.evaluate_pursuit_trigger(
                    &mut self.tracker,
                    self.motion.position,
                    world.targets,
                    self.config.vision_distance,
                );
                match signal {
                    TransitionSignal::Pursue(id) => {
                        debug!(agent = %self.id, target = %id, "target detected");
                        self.detected = Some(id);
                        self.state = AgentState::Chase;
                    }
                    TransitionSignal::ContinueWandering => self.state = AgentState::Default,
                }
                Some(target)
            }
        }
    }

    fn tick_chase(&mut self, world: &WorldView<'_>, finder: &dyn PathFinder) {
        let Some(id) = self.detected else {
            self.state = AgentState::Default;
            return;
        };

        let range  = self.pursuit_range();
        let here   = self.motion.position;
        let target = world
            .target(id)
            .filter(|t| t.is_active() && here.distance(t.position) <= range);

        let Some(target) = target else {
            if self.config.chase_lost == ChaseLostPolicy::Wander {
                debug!(agent = %self.id, target = %id, "target lost, resuming wander");
                self.abandon_chase();
            }
            return;
        };

        let goal = target
            .resolve_tile(world.graph)
            .and_then(|t| self.strategy.select_pursuit_target(world.graph, t, &mut self.rng));
        let Some(goal) = goal else {
            debug!(agent = %self.id, target = %id, "no pursuit goal");
            self.abandon_chase();
            return;
        };

        let mut plan = finder.astar_path(world.graph, self.current_tile, goal);
        match plan.pop_front() {
            Some(next) => {
                self.plan = plan;
                self.target_tile = Some(next);
                self.state = AgentState::Moving;
            }
            None => {
                debug!(agent = %self.id, from = %self.current_tile, %goal, "no pursuit path");
                self.abandon_chase();
            }
        }
    }

    /// Forget the detected target; the next `Default` tick re-plans a walk.
    fn abandon_chase(&mut self) {
        self.detected = None;
        self.plan.clear();
        self.state = AgentState::Default;
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: AgentState) {
        self.state = state;
    }
}

impl std::fmt::Debug for BehaviorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorController")
            .field("id", &self.id)
            .field("variant", &self.config.variant)
            .field("state", &self.state)
            .field("current_tile", &self.current_tile)
            .field("target_tile", &self.target_tile)
            .field("plan_len", &self.plan.len())
            .field("detected", &self.detected)
            .finish()
    }
}
