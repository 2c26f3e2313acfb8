//! Constant-speed steering towards a target point.

use nav_core::WorldPos;

use crate::{MobilityError, MobilityResult, MovementState};

/// Result of one [`Kinematics::advance`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still further than epsilon from the target.
    Moving,
    /// Within epsilon of the target.
    Arrived,
}

/// Per-agent motion parameters.
///
/// Validated once at construction; immutable afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kinematics {
    speed:           f32,
    arrival_epsilon: f32,
}

impl Kinematics {
    /// # Errors
    ///
    /// [`MobilityError::InvalidSpeed`] unless `speed` is positive and finite;
    /// [`MobilityError::InvalidEpsilon`] unless `arrival_epsilon` is
    /// non-negative and finite.
    pub fn new(speed: f32, arrival_epsilon: f32) -> MobilityResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(MobilityError::InvalidSpeed(speed));
        }
        if !(arrival_epsilon.is_finite() && arrival_epsilon >= 0.0) {
            return Err(MobilityError::InvalidEpsilon(arrival_epsilon));
        }
        Ok(Self { speed, arrival_epsilon })
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn arrival_epsilon(&self) -> f32 {
        self.arrival_epsilon
    }

    /// `true` once `state` is within epsilon of `target`.
    #[inline]
    pub fn has_arrived(&self, state: &MovementState, target: WorldPos) -> bool {
        state.remaining(target) <= self.arrival_epsilon
    }

    /// Move `state` towards `target` for `dt` seconds.
    ///
    /// The displacement is `normalize(target - position) * speed * dt`,
    /// shortened to the remaining distance when it would overshoot.  A
    /// non-positive or non-finite `dt` leaves the position unchanged.
    pub fn advance(&self, state: &mut MovementState, target: WorldPos, dt: f32) -> StepOutcome {
        if self.has_arrived(state, target) {
            state.stop();
            return StepOutcome::Arrived;
        }
        if !(dt.is_finite() && dt > 0.0) {
            state.stop();
            return StepOutcome::Moving;
        }

        let offset    = target - state.position;
        let remaining = offset.length();
        let step      = (self.speed * dt).min(remaining);

        state.velocity = offset.normalized() * (step / dt);
        if step >= remaining {
            state.position = target;
        } else {
            state.position += offset.normalized() * step;
        }

        if self.has_arrived(state, target) {
            StepOutcome::Arrived
        } else {
            StepOutcome::Moving
        }
    }

    /// Upper bound on the ticks needed to cover `distance` at `dt` per tick.
    pub fn ticks_to_cover(&self, distance: f32, dt: f32) -> u64 {
        if distance <= self.arrival_epsilon {
            return 0;
        }
        if !(dt.is_finite() && dt > 0.0) {
            return u64::MAX;
        }
        ((distance - self.arrival_epsilon) / (self.speed * dt)).ceil() as u64
    }
}
