/// All errors produced by the engine.
///
/// A single error type covers construction, inference, persistence and
/// training so callers can propagate everything with `?`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Shape sequence or hyperparameters rejected before any allocation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input vector length disagrees with `shapes[0]`.
    #[error("input has {got} values, network expects {expected}")]
    InputMismatch { expected: usize, got: usize },

    /// Target vector length disagrees with the output layer width.
    #[error("target has {got} values, network produces {expected}")]
    TargetMismatch { expected: usize, got: usize },

    /// Training data is empty or inputs/targets are not paired up.
    #[error("invalid training data: {0}")]
    Dataset(String),

    /// Decoded weights do not describe a consistent layer stack, or do not
    /// match the shapes the caller asked for.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch { expected: Vec<usize>, found: Vec<usize> },

    /// Persisted weights could not be decoded (truncated or malformed bytes).
    #[error("failed to decode weights: {0}")]
    Decode(#[from] bincode::Error),

    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The trainer or reporter thread died; no partial result is kept.
    #[error("training task failed: {0}")]
    TaskFailed(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
