//! Per-agent movement state.

use nav_core::WorldPos;

/// Where an agent is and how it moved on its last step.
///
/// `velocity` is transient: it is overwritten by every
/// [`Kinematics::advance`](crate::Kinematics::advance) call and zeroed when
/// the agent stops or is teleported.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementState {
    /// Current world position.
    pub position: WorldPos,

    /// Displacement per second applied on the last step.
    pub velocity: WorldPos,
}

impl MovementState {
    /// A stationary agent at `position`.
    #[inline]
    pub fn at(position: WorldPos) -> Self {
        Self { position, velocity: WorldPos::ZERO }
    }

    /// Teleport to `position` and stop.
    #[inline]
    pub fn place(&mut self, position: WorldPos) {
        self.position = position;
        self.velocity = WorldPos::ZERO;
    }

    #[inline]
    pub fn stop(&mut self) {
        self.velocity = WorldPos::ZERO;
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.velocity != WorldPos::ZERO
    }

    /// Straight-line distance left to `target`.
    #[inline]
    pub fn remaining(&self, target: WorldPos) -> f32 {
        self.position.distance(target)
    }
}
