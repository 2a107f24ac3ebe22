use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("action already registered: {0}")]
    DuplicateAction(String),

    #[error("invalid action registration: {0}")]
    Registration(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid arguments for {action}: {reason}")]
    SchemaValidation { action: String, reason: String },

    #[error("agent turn already terminated ({0})")]
    AlreadyTerminated(String),

    #[error("action call budget exhausted")]
    BudgetExhausted,
}
