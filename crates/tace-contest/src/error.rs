use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContestError {
    #[error("no scores to optimize")]
    EmptyInput,

    #[error("non-finite score for agent {0}")]
    InvalidScore(String),

    #[error("failed to persist contest result: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
