//! Simulation observer trait for progress reporting and data collection.

use nav_behavior::{BehaviorController, TickReport};
use nav_core::Tick;

/// Callbacks invoked by [`Sim`](crate::Sim) at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — chase logger
///
/// ```rust,ignore
/// struct ChaseLog;
///
/// impl SimObserver for ChaseLog {
///     fn on_transition(&mut self, tick: Tick, report: &TickReport) {
///         if report.to == AgentState::Chase {
///             println!("{tick}: {} starts chasing", report.agent);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any agent runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every agent whose state changed or that reached a tile
    /// this tick, in ascending `AgentId` order.
    fn on_transition(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called at the end of each tick with read-only access to every agent.
    fn on_tick_end(&mut self, _tick: Tick, _agents: &[BehaviorController]) {}

    /// Called once after the final tick of [`Sim::run`](crate::Sim::run).
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
