//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use nav_behavior::{AgentConfig, BehaviorController, TrackedTarget, WorldStatus};
use nav_core::{AgentId, SimConfig, TileId};
use nav_spatial::{PathFinder, TileGraph};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, tick duration, …
/// - [`TileGraph`] — the navigation graph
/// - `P: PathFinder` — the pathfinding engine (e.g. [`nav_spatial::TilePathFinder`])
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                            |
/// |----------------------|------------------------------------|
/// | `.agent(c)`          | no agents                          |
/// | `.agent_at(c, tile)` | —; otherwise random walkable spawn |
/// | `.targets(v)`        | no targets                         |
/// | `.status(s)`         | not halted                         |
///
/// Agents get `AgentId`s in the order they are added.
pub struct SimBuilder<P: PathFinder> {
    config:  SimConfig,
    graph:   TileGraph,
    finder:  P,
    agents:  Vec<(AgentConfig, Option<TileId>)>,
    targets: Vec<TrackedTarget>,
    status:  WorldStatus,
}

impl<P: PathFinder> SimBuilder<P> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, graph: TileGraph, finder: P) -> Self {
        Self {
            config,
            graph,
            finder,
            agents:  Vec::new(),
            targets: Vec::new(),
            status:  WorldStatus::default(),
        }
    }

    /// Add an agent spawned on a random walkable tile.
    pub fn agent(mut self, config: AgentConfig) -> Self {
        self.agents.push((config, None));
        self
    }

    /// Add several randomly spawned agents.
    pub fn agents(mut self, configs: impl IntoIterator<Item = AgentConfig>) -> Self {
        self.agents.extend(configs.into_iter().map(|c| (c, None)));
        self
    }

    /// Add an agent spawned on `tile`.
    pub fn agent_at(mut self, config: AgentConfig, tile: TileId) -> Self {
        self.agents.push((config, Some(tile)));
        self
    }

    pub fn targets(mut self, targets: Vec<TrackedTarget>) -> Self {
        self.targets = targets;
        self
    }

    pub fn status(mut self, status: WorldStatus) -> Self {
        self.status = status;
        self
    }

    /// Validate inputs, create and spawn every agent, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        let mut seen = HashSet::with_capacity(self.targets.len());
        for t in &self.targets {
            if !seen.insert(t.id) {
                return Err(SimError::DuplicateTarget(t.id));
            }
        }

        // ── Create and place agents ───────────────────────────────────────
        let mut agents = Vec::with_capacity(self.agents.len());
        for (i, (config, spawn)) in self.agents.into_iter().enumerate() {
            let mut agent = BehaviorController::new(AgentId(i as u32), config, self.config.seed)?;
            match spawn {
                Some(tile) => agent.place(&self.graph, tile)?,
                None => agent.reset(&self.graph)?,
            }
            agents.push(agent);
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        Ok(Sim {
            clock:   self.config.make_clock(),
            config:  self.config,
            graph:   self.graph,
            finder:  self.finder,
            agents,
            targets: self.targets,
            status:  self.status,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
