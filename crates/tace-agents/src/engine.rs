use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tace_contest::{optimize, ResultStore};
use tace_gateway::ActionGateway;
use tace_models::{ContestResult, EngineConfig, Signal};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::EngineError;
use crate::predictor::PerformancePredictor;
use crate::runner::{AgentRunner, TurnContext};

/// Outcome of one contest cycle.
///
/// `document_path` is None when persistence failed; the in-memory result is
/// still valid and `persist_error` carries the reason.
#[derive(Debug)]
pub struct CycleReport {
    pub result: ContestResult,
    pub document_path: Option<PathBuf>,
    pub persist_error: Option<String>,
    /// Agents whose turn ended without a terminal action (error, timeout,
    /// or panic). Excluded from scoring entirely.
    pub aborted_agents: Vec<String>,
}

/// Runs the full contest cycle: all agent turns concurrently, then
/// prediction, weight optimization and persistence.
pub struct ContestEngine {
    runners: Vec<Arc<dyn AgentRunner>>,
    predictor: Arc<dyn PerformancePredictor>,
    gateway: Arc<ActionGateway>,
    store: ResultStore,
    config: EngineConfig,
}

impl ContestEngine {
    pub fn new(
        runners: Vec<Arc<dyn AgentRunner>>,
        predictor: Arc<dyn PerformancePredictor>,
        gateway: Arc<ActionGateway>,
        store: ResultStore,
        config: EngineConfig,
    ) -> Self {
        Self {
            runners,
            predictor,
            gateway,
            store,
            config,
        }
    }

    /// Run one cycle keyed by `trigger_time`.
    ///
    /// Agent failures degrade gracefully: a crashed, timed-out or declining
    /// agent just drops out of this cycle's contest. The cycle itself fails
    /// only when no signal at all was produced, the predictor broke its
    /// contract, or the score set could not be optimized.
    pub async fn run_cycle(&self, trigger_time: &str) -> Result<CycleReport, EngineError> {
        let started = Instant::now();
        let cancel = CancellationToken::new();
        let ctx = TurnContext {
            trigger_time: trigger_time.to_string(),
            gateway: Arc::clone(&self.gateway),
            deadline: started + Duration::from_secs(self.config.cycle_timeout_seconds),
            max_actions: self.config.max_actions_per_turn,
            cancel: cancel.clone(),
        };
        let turn_budget = Duration::from_secs(self.config.turn_timeout_seconds);

        info!(
            trigger_time,
            agents = self.runners.len(),
            "Starting contest cycle"
        );

        let mut join_set = JoinSet::new();
        for runner in &self.runners {
            let runner = Arc::clone(runner);
            let ctx = ctx.clone();
            join_set.spawn(async move {
                let agent_id = runner.agent_id().to_string();
                let result = tokio::time::timeout(turn_budget, runner.run(&ctx)).await;
                (agent_id, result)
            });
        }

        let mut signals: HashMap<String, Signal> = HashMap::new();
        let mut aborted_agents = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((agent_id, Ok(Ok(Some(signal))))) => {
                    info!(agent = %agent_id, instrument = %signal.instrument_id, "Signal received");
                    signals.insert(agent_id, signal);
                }
                Ok((agent_id, Ok(Ok(None)))) => {
                    info!(agent = %agent_id, "Agent declined this cycle");
                }
                Ok((agent_id, Ok(Err(e)))) => {
                    warn!(agent = %agent_id, error = %e, "Agent turn failed");
                    aborted_agents.push(agent_id);
                }
                Ok((agent_id, Err(_))) => {
                    warn!(
                        agent = %agent_id,
                        budget_secs = turn_budget.as_secs(),
                        "Agent turn timed out"
                    );
                    aborted_agents.push(agent_id);
                }
                Err(e) => {
                    error!(error = %e, "Agent task panicked");
                    aborted_agents.push("<unknown>".to_string());
                }
            }
        }
        cancel.cancel();

        if signals.is_empty() {
            return Err(EngineError::EmptyCycle(trigger_time.to_string()));
        }

        let predicted = self
            .predictor
            .predict(&signals)
            .await
            .map_err(|e| EngineError::Predictor(e.to_string()))?;

        // Only agents with a signal this cycle enter the contest; a
        // predictor may score more broadly than that.
        let mut scores = HashMap::with_capacity(signals.len());
        for agent in signals.keys() {
            match predicted.get(agent) {
                Some(score) => {
                    scores.insert(agent.clone(), *score);
                }
                None => {
                    return Err(EngineError::Predictor(format!(
                        "no score returned for agent {agent}"
                    )));
                }
            }
        }

        let weights = optimize(&scores)?;

        let (result, document_path, persist_error) =
            match self.store.save(trigger_time, &weights, &scores) {
                Ok((result, path)) => (result, Some(path), None),
                Err(e) => {
                    warn!(trigger_time, error = %e, "Failed to persist contest result");
                    (
                        self.store.build(trigger_time, &weights, &scores),
                        None,
                        Some(e.to_string()),
                    )
                }
            };

        info!(
            trigger_time,
            valid = result.valid_signals,
            total = result.total_signals,
            aborted = aborted_agents.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Contest cycle complete"
        );

        Ok(CycleReport {
            result,
            document_path,
            persist_error,
            aborted_agents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::register_builtin_actions;
    use crate::test_support::{MockBehavior, MockPredictor, MockRunner};
    use tace_models::GatewayConfig;

    const TRIGGER: &str = "2026-08-27 09:30:00";

    fn engine(
        runners: Vec<Arc<dyn AgentRunner>>,
        predictor: MockPredictor,
        dir: &std::path::Path,
    ) -> ContestEngine {
        let mut gateway = ActionGateway::new();
        register_builtin_actions(&mut gateway, &GatewayConfig::default()).unwrap();
        ContestEngine::new(
            runners,
            Arc::new(predictor),
            Arc::new(gateway),
            ResultStore::new(dir, "sharpe_proportional"),
            EngineConfig {
                cycle_timeout_seconds: 30,
                turn_timeout_seconds: 2,
                max_actions_per_turn: 8,
                agents: Vec::new(),
            },
        )
    }

    #[tokio::test]
    async fn two_agents_split_proportionally() {
        let dir = tempfile::tempdir().unwrap();
        let runners: Vec<Arc<dyn AgentRunner>> = vec![
            Arc::new(MockRunner::new("alpha", MockBehavior::Decide)),
            Arc::new(MockRunner::new("beta", MockBehavior::Decide)),
        ];
        let engine = engine(
            runners,
            MockPredictor::new(&[("alpha", 0.5), ("beta", 1.5)]),
            dir.path(),
        );

        let report = engine.run_cycle(TRIGGER).await.unwrap();
        assert!((report.result.weights["alpha"] - 0.25).abs() < 1e-9);
        assert!((report.result.weights["beta"] - 0.75).abs() < 1e-9);
        assert!(report.document_path.as_ref().unwrap().exists());
        assert!(report.persist_error.is_none());
        assert!(report.aborted_agents.is_empty());
    }

    #[tokio::test]
    async fn failed_agent_excluded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let runners: Vec<Arc<dyn AgentRunner>> = vec![
            Arc::new(MockRunner::new("alpha", MockBehavior::Decide)),
            Arc::new(MockRunner::new("broken", MockBehavior::Fail)),
        ];
        let engine = engine(runners, MockPredictor::new(&[("alpha", 1.0)]), dir.path());

        let report = engine.run_cycle(TRIGGER).await.unwrap();
        assert_eq!(report.aborted_agents, vec!["broken".to_string()]);
        assert!((report.result.weights["alpha"] - 1.0).abs() < 1e-9);
        assert!(!report.result.weights.contains_key("broken"));
    }

    #[tokio::test]
    async fn no_signals_is_empty_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let runners: Vec<Arc<dyn AgentRunner>> = vec![
            Arc::new(MockRunner::new("alpha", MockBehavior::Decline)),
            Arc::new(MockRunner::new("broken", MockBehavior::Fail)),
        ];
        let engine = engine(runners, MockPredictor::new(&[]), dir.path());

        let err = engine.run_cycle(TRIGGER).await.unwrap_err();
        assert!(matches!(err, EngineError::EmptyCycle(_)));
    }

    #[tokio::test]
    async fn predictor_failure_aborts_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let runners: Vec<Arc<dyn AgentRunner>> =
            vec![Arc::new(MockRunner::new("alpha", MockBehavior::Decide))];
        let engine = engine(runners, MockPredictor::failing(), dir.path());

        let err = engine.run_cycle(TRIGGER).await.unwrap_err();
        assert!(matches!(err, EngineError::Predictor(_)));
    }

    #[tokio::test]
    async fn hanging_agent_times_out_and_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let runners: Vec<Arc<dyn AgentRunner>> = vec![
            Arc::new(MockRunner::new("alpha", MockBehavior::Decide)),
            Arc::new(MockRunner::new("stuck", MockBehavior::Hang)),
        ];
        let engine = engine(runners, MockPredictor::new(&[("alpha", 1.0)]), dir.path());

        let started = Instant::now();
        let report = engine.run_cycle(TRIGGER).await.unwrap();
        assert!(report.aborted_agents.contains(&"stuck".to_string()));
        // Bounded by the 2s turn budget, not the 30s cycle budget.
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
