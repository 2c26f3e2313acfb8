//! The `Sim` struct and its tick loop.

use tracing::info;

use nav_behavior::{BehaviorController, TickReport, TrackedTarget, WorldStatus, WorldView};
use nav_core::{AgentId, SimClock, SimConfig, TargetId, Tick};
use nav_spatial::{PathFinder, TileGraph};

use crate::{SimError, SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim<P>` owns the tile graph, the tracked targets, and one
/// [`BehaviorController`] per agent (indexed by `AgentId`).  Each tick it
/// builds a [`WorldView`] over the graph and targets and ticks every agent
/// against it.
///
/// Create via [`SimBuilder`](crate::SimBuilder).
pub struct Sim<P: PathFinder> {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock.  Its tick duration is every agent's `dt`.
    pub clock: SimClock,

    /// Immutable navigation graph shared by all agents.
    pub graph: TileGraph,

    /// The pathfinding engine.  Shared by all agents.
    pub finder: P,

    pub(crate) agents:  Vec<BehaviorController>,
    pub(crate) targets: Vec<TrackedTarget>,
    pub(crate) status:  WorldStatus,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<P: PathFinder> Sim<P> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn agents(&self) -> &[BehaviorController] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&BehaviorController> {
        self.agents.get(id.index())
    }

    pub fn targets(&self) -> &[TrackedTarget] {
        &self.targets
    }

    /// Mutable access for the host to move, kill, or finish targets between
    /// ticks.  Adding a target with an id already present makes lookups
    /// resolve to the first one.
    pub fn targets_mut(&mut self) -> &mut Vec<TrackedTarget> {
        &mut self.targets
    }

    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut TrackedTarget> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    pub fn status(&self) -> WorldStatus {
        self.status
    }

    /// Set the global halt flags.  While halted, ticks still advance the
    /// clock but agents do nothing.
    pub fn set_status(&mut self, status: WorldStatus) {
        self.status = status;
    }

    /// Respawn one agent on a random walkable tile.
    pub fn reset_agent(&mut self, id: AgentId) -> SimResult<()> {
        let agent = self.agents.get_mut(id.index()).ok_or(SimError::UnknownAgent(id))?;
        agent.reset(&self.graph)?;
        Ok(())
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        info!(
            agents  = self.agents.len(),
            targets = self.targets.len(),
            from    = %self.clock.current_tick,
            to      = %self.config.end_tick(),
            "simulation start"
        );
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(clock = %self.clock, "simulation end");
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Process one tick and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let reports = self.process_tick(now);
        for report in reports.iter().filter(|r| r.changed() || r.arrived.is_some()) {
            observer.on_transition(now, report);
        }

        observer.on_tick_end(now, &self.agents);
        self.clock.advance();
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Tick every agent.  Reports come back in ascending `AgentId` order.
    fn process_tick(&mut self, now: Tick) -> Vec<TickReport> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let world = WorldView::new(
            &self.graph,
            &self.targets,
            self.status,
            self.clock.tick_duration_secs,
            now,
        );
        let finder = &self.finder;
        let agents = &mut self.agents;

        #[cfg(not(feature = "parallel"))]
        {
            agents.iter_mut().map(|a| a.tick(&world, finder)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Indexed collect keeps AgentId order.
            let world = &world;
            match &self.pool {
                Some(pool) => pool.install(|| {
                    agents.par_iter_mut().map(|a| a.tick(world, finder)).collect()
                }),
                None => agents.par_iter_mut().map(|a| a.tick(world, finder)).collect(),
            }
        }
    }
}
