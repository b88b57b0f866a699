//! Error type shared by every stage of the regime pipeline.

/// Errors that can occur while windowing, embedding, extracting
/// topological features or classifying.
#[derive(Debug, thiserror::Error)]
pub enum RegimeError {
    #[error("invalid window size {window} for series of length {len}")]
    InvalidWindowSize { window: usize, len: usize },

    #[error("invalid embedding configuration: {0}")]
    InvalidEmbeddingConfig(String),

    #[error(
        "degenerate embedding geometry: window {window} too short for delay {delay} \
         and dimension {dimension}"
    )]
    DegenerateGeometry {
        window: usize,
        delay: usize,
        dimension: usize,
    },

    #[error("{0} used before fit")]
    NotFitted(&'static str),

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("test fraction must lie in (0, 1), got {0}")]
    InvalidSplit(f64),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RegimeError>;
