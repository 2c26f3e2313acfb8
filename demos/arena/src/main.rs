//! arena — three agent variants hunting a scripted runner in a walled map.
//!
//! The runner walks an A* route from its start tile to its goal tile.  One
//! agent of each variant roams the arena; hunters and stalkers that spot the
//! runner chase it.  The session ends when the runner reaches its goal or an
//! agent catches it, after which every agent stops.
//!
//! Set `RUST_LOG=nav_behavior=debug` to see every state transition.

mod map;

use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use nav_behavior::{AgentConfig, AgentState, BehaviorController, TickReport, TrackedTarget, WorldStatus};
use nav_core::{SimConfig, TargetId, Tick, TileId};
use nav_mobility::{Kinematics, MovementState, StepOutcome};
use nav_sim::{SimBuilder, SimObserver};
use nav_spatial::{GridLayout, PathFinder, Plan, TileGraph, TilePathFinder};

// ── Constants ─────────────────────────────────────────────────────────────────

const RUNNER:       TargetId = TargetId(0);
const CATCH_RADIUS: f32      = 0.5;

// ── Roster ────────────────────────────────────────────────────────────────────

// Omitted agent fields take their defaults.
const ROSTER_JSON: &str = r#"{
  "sim": { "tick_duration_secs": 0.05, "total_ticks": 6000, "seed": 42, "num_threads": null },
  "runner": { "start": [1, 1], "goal": [14, 10], "speed": 0.6 },
  "agents": [
    { "variant": "wanderer" },
    { "variant": "hunter", "vision_distance": 4.0, "max_counter": 3 },
    { "variant": "stalker", "max_counter": 4, "chase_lost": "wander" },
    { "variant": "hunter", "speed": 0.8 }
  ]
}"#;

#[derive(Deserialize)]
struct Roster {
    sim:    SimConfig,
    runner: RunnerSpec,
    agents: Vec<AgentConfig>,
}

#[derive(Deserialize)]
struct RunnerSpec {
    start: (u32, u32),
    goal:  (u32, u32),
    speed: f32,
}

// ── Scripted runner ───────────────────────────────────────────────────────────

/// The tracked target: follows a fixed A* route at constant speed.
struct Runner {
    plan:   Plan,
    next:   Option<TileId>,
    tile:   TileId,
    goal:   TileId,
    motion: MovementState,
    kin:    Kinematics,
}

impl Runner {
    fn new(graph: &TileGraph, layout: &GridLayout, spec: &RunnerSpec) -> Result<Self> {
        let cell = |(c, r): (u32, u32)| layout.tile(c, r).with_context(|| format!("cell ({c}, {r}) is outside the map"));
        let start = cell(spec.start)?;
        let goal  = cell(spec.goal)?;
        let mut plan = TilePathFinder::new().astar_path(graph, start, goal);
        if plan.is_empty() && start != goal {
            anyhow::bail!("runner goal {goal} is unreachable from {start}");
        }
        let next = plan.pop_front();
        Ok(Self {
            plan,
            next,
            tile: start,
            goal,
            motion: MovementState::at(graph.try_pos(start)?),
            kin:    Kinematics::new(spec.speed, 0.05)?,
        })
    }

    fn advance(&mut self, graph: &TileGraph, dt: f32) {
        let Some(next) = self.next else { return };
        if self.kin.advance(&mut self.motion, graph.pos(next), dt) == StepOutcome::Arrived {
            self.tile = next;
            self.next = self.plan.pop_front();
        }
    }

    fn at_goal(&self) -> bool {
        self.tile == self.goal
    }

    fn publish(&self, target: &mut TrackedTarget) {
        target.position     = self.motion.position;
        target.tile         = Some(self.tile);
        target.goal_reached = self.at_goal();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

struct ArenaLog {
    arrivals: Vec<usize>,
    chases:   Vec<usize>,
}

impl ArenaLog {
    fn new(agents: usize) -> Self {
        Self { arrivals: vec![0; agents], chases: vec![0; agents] }
    }
}

impl SimObserver for ArenaLog {
    fn on_transition(&mut self, tick: Tick, report: &TickReport) {
        let i = report.agent.index();
        if report.arrived.is_some() {
            self.arrivals[i] += 1;
        }
        if report.changed() && report.to == AgentState::Chase {
            self.chases[i] += 1;
            info!(%tick, agent = %report.agent, "chase started");
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        info!(%final_tick, "session over");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("arena=info".parse()?))
        .init();

    let roster: Roster = serde_json::from_str(ROSTER_JSON).context("parsing roster")?;
    let (graph, layout) = map::parse(map::ARENA)?;
    info!(
        tiles    = graph.tile_count(),
        walkable = graph.walkable_tiles().count(),
        edges    = graph.edge_count(),
        "arena loaded"
    );

    let mut runner = Runner::new(&graph, &layout, &roster.runner)?;
    let target = TrackedTarget::on_tile(RUNNER, &graph, runner.tile)?;
    let agent_count = roster.agents.len();
    let dt = roster.sim.tick_duration_secs;

    let mut sim = SimBuilder::new(roster.sim, graph, TilePathFinder::new())
        .agents(roster.agents)
        .targets(vec![target])
        .build()?;
    let mut log = ArenaLog::new(agent_count);

    let t0 = Instant::now();
    let end = sim.config.end_tick();
    while sim.clock.current_tick < end && !sim.status().is_halted() {
        let now = sim.clock.current_tick;
        runner.advance(&sim.graph, dt);
        let runner_pos = runner.motion.position;
        let caught_by = sim
            .agents()
            .iter()
            .find(|a| a.position().distance(runner_pos) <= CATCH_RADIUS)
            .map(BehaviorController::id);

        let target = sim.target_mut(RUNNER).context("runner target missing")?;
        runner.publish(target);
        if let Some(agent) = caught_by {
            target.alive = false;
            info!(%agent, tick = %now, "runner caught");
        } else if runner.at_goal() {
            info!(tick = %now, "runner reached its goal");
        }
        if !target.is_active() {
            sim.set_status(WorldStatus { session_finished: true, ..sim.status() });
        }

        sim.step(&mut log);
    }
    log.on_sim_end(sim.clock.current_tick);
    let elapsed = t0.elapsed();

    // ── Summary ───────────────────────────────────────────────────────────
    println!("Simulated {} ticks in {:.3} s", sim.clock.current_tick.0, elapsed.as_secs_f64());
    println!();
    println!("{:<8} {:<10} {:<8} {:<12} {:>9} {:>7}", "Agent", "Variant", "State", "Tile", "Arrivals", "Chases");
    println!("{}", "-".repeat(60));
    for a in sim.agents() {
        let i = a.id().index();
        println!(
            "{:<8} {:<10} {:<8} {:<12} {:>9} {:>7}",
            a.id().0,
            format!("{:?}", a.variant()),
            a.state().to_string(),
            format!("{:?}", layout.coords(a.current_tile()).unwrap_or_default()),
            log.arrivals[i],
            log.chases[i],
        );
    }
    Ok(())
}
