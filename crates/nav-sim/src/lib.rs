//! `nav-sim` — tick loop orchestrator for the tile_nav framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① View     — bundle the tile graph, tracked targets and world status
//!                into one read-only WorldView.
//!   ② Agents   — BehaviorController::tick for every agent
//!                (parallel with the `parallel` feature).
//!   ③ Reports  — TickReports handed to the observer in ascending AgentId
//!                order, whichever way step ② ran.
//! ```
//!
//! Between ticks the host updates targets through [`Sim::targets_mut`] and
//! the halt flags through [`Sim::set_status`].
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Ticks agents on Rayon's thread pool.                   |
//! | `serde`    | Forwards serde derives to the lower crates.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_behavior::{AgentConfig, BehaviorVariant};
//! use nav_core::SimConfig;
//! use nav_sim::{NoopObserver, SimBuilder};
//! use nav_spatial::{GridBuilder, TilePathFinder};
//!
//! let (graph, _) = GridBuilder::new(16, 16).build();
//! let mut sim = SimBuilder::new(SimConfig::default(), graph, TilePathFinder::new())
//!     .agent(AgentConfig::new(BehaviorVariant::Hunter))
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
