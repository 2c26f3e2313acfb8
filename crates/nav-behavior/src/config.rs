//! Per-agent configuration.

use crate::{BehaviorError, BehaviorResult, BehaviorVariant};

/// What a chasing agent does when its target is out of range or inactive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChaseLostPolicy {
    /// Stay in `Chase` and re-check every tick.
    #[default]
    Hold,
    /// Forget the target and go back to wandering.
    Wander,
}

/// Tuning for one agent.  Validated by
/// [`BehaviorController::new`](crate::BehaviorController::new), immutable
/// afterwards.
///
/// | Field              | Default    |
/// |--------------------|------------|
/// | `variant`          | `Wanderer` |
/// | `speed`            | 1.0 / s    |
/// | `vision_distance`  | 5.0        |
/// | `max_counter`      | 5          |
/// | `max_random_steps` | 20         |
/// | `chase_lost`       | `Hold`     |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub variant: BehaviorVariant,

    /// World units per second.
    pub speed: f32,

    /// Detection radius in world units.  Some variants scale it.
    pub vision_distance: f32,

    /// Arrivals between perception scans.
    pub max_counter: u32,

    /// Length cap of each random wander plan.
    pub max_random_steps: usize,

    pub chase_lost: ChaseLostPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            variant:          BehaviorVariant::Wanderer,
            speed:            1.0,
            vision_distance:  5.0,
            max_counter:      5,
            max_random_steps: 20,
            chase_lost:       ChaseLostPolicy::Hold,
        }
    }
}

impl AgentConfig {
    /// Defaults with the given variant.
    pub fn new(variant: BehaviorVariant) -> Self {
        Self { variant, ..Self::default() }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_vision(mut self, vision_distance: f32) -> Self {
        self.vision_distance = vision_distance;
        self
    }

    pub fn with_max_counter(mut self, max_counter: u32) -> Self {
        self.max_counter = max_counter;
        self
    }

    pub fn with_random_steps(mut self, max_random_steps: usize) -> Self {
        self.max_random_steps = max_random_steps;
        self
    }

    pub fn with_chase_lost(mut self, policy: ChaseLostPolicy) -> Self {
        self.chase_lost = policy;
        self
    }

    pub fn validate(&self) -> BehaviorResult<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(BehaviorError::Config(format!(
                "speed must be positive and finite, got {}",
                self.speed
            )));
        }
        if !(self.vision_distance.is_finite() && self.vision_distance > 0.0) {
            return Err(BehaviorError::Config(format!(
                "vision_distance must be positive and finite, got {}",
                self.vision_distance
            )));
        }
        if self.max_counter == 0 {
            return Err(BehaviorError::Config("max_counter must be at least 1".into()));
        }
        if self.max_random_steps == 0 {
            return Err(BehaviorError::Config("max_random_steps must be at least 1".into()));
        }
        Ok(())
    }
}
