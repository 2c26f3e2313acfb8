//! `nav-behavior` — perception and the per-agent wander/chase state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`config`]     | `AgentConfig`, `ChaseLostPolicy` — validated per-agent tuning   |
//! | [`variant`]    | `BehaviorVariant`, `BehaviorStrategy` trait + three strategies  |
//! | [`perception`] | `PerceptionTracker`, `TransitionSignal` — throttled target scan |
//! | [`context`]    | `WorldView<'a>`, `TrackedTarget`, `WorldStatus`                 |
//! | [`state`]      | `AgentState` — FSM states                                       |
//! | [`controller`] | `BehaviorController`, `TickReport` — the state machine itself   |
//! | [`error`]      | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! # Design notes
//!
//! One controller per agent owns everything that changes: its plan, tiles,
//! FSM state, perception counter, and RNG.  The tile graph and the tracked
//! target slice are borrowed read-only through [`WorldView`] for the span of
//! one tick, so many controllers can tick in parallel.
//!
//! Variant-specific decisions (how to wander, when to pursue, where to aim)
//! live behind the [`BehaviorStrategy`] trait.  The state machine itself is
//! written once.

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod perception;
pub mod state;
pub mod variant;

#[cfg(test)]
mod tests;

pub use config::{AgentConfig, ChaseLostPolicy};
pub use context::{TrackedTarget, WorldStatus, WorldView};
pub use controller::{BehaviorController, TickReport};
pub use error::{BehaviorError, BehaviorResult};
pub use perception::{PerceptionTracker, TransitionSignal};
pub use state::AgentState;
pub use variant::{BehaviorStrategy, BehaviorVariant, DirectPursuit, FlankingPursuit, WanderOnly};
