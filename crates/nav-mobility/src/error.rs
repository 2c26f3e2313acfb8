use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),

    #[error("arrival epsilon must be non-negative and finite, got {0}")]
    InvalidEpsilon(f32),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
