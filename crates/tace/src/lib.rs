//! TACE - Trading Agent Contest Engine
//!
//! Runs a per-cycle contest between external trading agents: each agent
//! takes one bounded turn against a shared action gateway, the surviving
//! signals are scored by a performance predictor, and the scores are
//! normalized into capital weights persisted as one document per trigger
//! time.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use tace::models::{TaceConfig, Signal};
//! use tace::agents::{ContestEngine, CommandRunner, AgentRunner};
//! use tace::gateway::ActionGateway;
//! use tace::contest::{optimize, ResultStore};
//! ```

pub use tace_agents as agents;
pub use tace_contest as contest;
pub use tace_gateway as gateway;
pub use tace_models as models;

use std::sync::Arc;
use std::time::Duration;

use tace_agents::{
    register_builtin_actions, AgentRunner, CommandPredictor, CommandRunner, ContestEngine,
    CycleReport, EngineError,
};
use tace_contest::ResultStore;
use tace_gateway::ActionGateway;
use tace_models::TaceConfig;

/// Build a ContestEngine from configuration.
pub fn build_engine(config: &TaceConfig) -> Result<ContestEngine, anyhow::Error> {
    let mut gateway = ActionGateway::new();
    register_builtin_actions(&mut gateway, &config.gateway)?;

    let turn_timeout = Duration::from_secs(config.engine.turn_timeout_seconds);
    let runners: Vec<Arc<dyn AgentRunner>> = config
        .engine
        .agents
        .iter()
        .filter(|a| a.enabled)
        .map(|a| {
            Arc::new(CommandRunner::new(
                a.name.clone(),
                a.command.clone(),
                a.args.clone(),
                turn_timeout,
            )) as Arc<dyn AgentRunner>
        })
        .collect();

    let predictor = Arc::new(CommandPredictor::new(
        config.predictor.command.clone(),
        config.predictor.args.clone(),
        Duration::from_secs(config.predictor.timeout_seconds),
    ));

    let store = ResultStore::new(
        config.contest.results_dir.clone(),
        config.contest.selection_method.clone(),
    );

    Ok(ContestEngine::new(
        runners,
        predictor,
        Arc::new(gateway),
        store,
        config.engine.clone(),
    ))
}

/// Run one contest cycle for the given trigger time.
pub async fn run_cycle(
    engine: &ContestEngine,
    trigger_time: &str,
) -> Result<CycleReport, EngineError> {
    engine.run_cycle(trigger_time).await
}
