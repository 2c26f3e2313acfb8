//! FSM states.

/// Behavior state of one agent.
///
/// `Rest` and `Static` exist for hosts that park agents explicitly; the
/// controller itself never enters them and leaves them on the next tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// Idle between moves; picks the next tile of the plan.
    #[default]
    Default,
    /// Walking towards the target tile.
    Moving,
    /// A target was detected; re-planning towards it each tick.
    Chase,
    Rest,
    Static,
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentState::Default => "default",
            AgentState::Moving  => "moving",
            AgentState::Chase   => "chase",
            AgentState::Rest    => "rest",
            AgentState::Static  => "static",
        };
        f.write_str(s)
    }
}
