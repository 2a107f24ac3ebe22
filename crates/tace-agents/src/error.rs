use thiserror::Error;

/// Failures local to one agent's run. Never fatal to the contest cycle.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("command error: {0}")]
    Command(String),

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("agent timed out after {0} seconds")]
    Timeout(u64),

    #[error("gateway error: {0}")]
    Gateway(#[from] tace_gateway::GatewayError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures that abort a whole contest cycle.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no agent produced a signal for trigger time {0}")]
    EmptyCycle(String),

    #[error("predictor contract violation: {0}")]
    Predictor(String),

    #[error("contest error: {0}")]
    Contest(#[from] tace_contest::ContestError),
}
