use nav_behavior::BehaviorError;
use nav_core::{AgentId, NavError, TargetId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] NavError),

    #[error("agent error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("agent {0} does not exist")]
    UnknownAgent(AgentId),

    #[error("target {0} is registered twice")]
    DuplicateTarget(TargetId),
}

pub type SimResult<T> = Result<T, SimError>;
