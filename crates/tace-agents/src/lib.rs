//! Agent runners, the performance predictor and the contest engine.
//!
//! A cycle fans out one turn per configured agent against the shared action
//! gateway, gathers the surviving signals, asks the predictor for per-agent
//! performance scores, converts them to capital weights and persists one
//! result document for the trigger time.

pub mod actions;
pub mod command;
pub mod engine;
pub mod error;
pub mod parser;
pub mod predictor;
pub mod runner;
pub mod test_support;

pub use actions::{register_builtin_actions, REPORT_NO_ACTION, SUBMIT_SIGNAL};
pub use engine::{ContestEngine, CycleReport};
pub use error::{AgentError, EngineError};
pub use predictor::{CommandPredictor, PerformancePredictor};
pub use runner::{AgentRunner, CommandRunner, TurnContext};
