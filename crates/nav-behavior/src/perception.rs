//! Throttled target detection.
//!
//! Agents do not look around on every arrival.  A per-agent counter starts
//! at `max_counter` and drops by one per arrival; only when it reaches zero
//! does the agent scan.  A successful scan refills the counter; a failed one
//! leaves it at zero, so the agent keeps scanning on every arrival until it
//! sees something.

use nav_core::{TargetId, WorldPos};

use crate::TrackedTarget;

/// Outcome of an arrival as seen by perception.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionSignal {
    Pursue(TargetId),
    ContinueWandering,
}

/// Hysteresis counter for one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PerceptionTracker {
    counter:     u32,
    max_counter: u32,
}

impl PerceptionTracker {
    /// A full counter; the first scan happens on the `max_counter`-th arrival.
    pub fn new(max_counter: u32) -> Self {
        Self { counter: max_counter, max_counter }
    }

    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    #[inline]
    pub fn max_counter(&self) -> u32 {
        self.max_counter
    }

    pub fn reset(&mut self) {
        self.counter = self.max_counter;
    }

    /// Register one arrival at `position` and scan if the counter ran out.
    pub fn on_arrival(
        &mut self,
        position: WorldPos,
        targets:  &[TrackedTarget],
        range:    f32,
    ) -> TransitionSignal {
        self.counter = self.counter.saturating_sub(1);
        if self.counter > 0 {
            return TransitionSignal::ContinueWandering;
        }
        match scan(position, targets, range) {
            Some(id) => {
                self.reset();
                TransitionSignal::Pursue(id)
            }
            None => TransitionSignal::ContinueWandering,
        }
    }
}

/// First active target, in slice order, within `range` of `position`.
pub fn scan(position: WorldPos, targets: &[TrackedTarget], range: f32) -> Option<TargetId> {
    targets
        .iter()
        .filter(|t| t.is_active())
        .find(|t| position.distance(t.position) <= range)
        .map(|t| t.id)
}
