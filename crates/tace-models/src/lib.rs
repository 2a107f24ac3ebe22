pub mod config;
pub mod contest_result;
pub mod signal;

pub use config::{
    AgentConfig, ContestConfig, EngineConfig, GatewayConfig, PredictorConfig, TaceConfig,
};
pub use contest_result::{ContestResult, ResultDocument, ResultSummary};
pub use signal::{Evidence, JudgeScore, Signal, SignalAction, SIGNAL_SCHEMA_VERSION};
