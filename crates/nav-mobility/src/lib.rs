//! `nav-mobility` — continuous movement between tile centres.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`state`]   | `MovementState` — per-agent position and last velocity            |
//! | [`engine`]  | `Kinematics`, `StepOutcome` — constant-speed steering + arrival   |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                              |
//!
//! # Movement model (continuous steering)
//!
//! Each tick the agent moves straight towards its target tile's world
//! position at a constant speed:
//!
//! 1. `direction = normalize(target - position)`
//! 2. `position += direction * speed * dt`, clamped so it never passes the
//!    target.
//! 3. The step reports [`StepOutcome::Arrived`] once the remaining distance
//!    is within the arrival epsilon.
//!
//! The clamp keeps arrival detection monotone: an agent with a small epsilon
//! and a large `speed * dt` lands on the target instead of oscillating
//! around it.

pub mod engine;
pub mod error;
pub mod state;


pub use engine::{Kinematics, StepOutcome};
pub use error::{MobilityError, MobilityResult};
pub use state::MovementState;
