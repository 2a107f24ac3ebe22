use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tace_models::Signal;
use tracing::debug;

use crate::command::invoke_command;
use crate::error::AgentError;
use crate::parser::parse_score_map;

/// Estimates forward risk-adjusted performance per agent from the cycle's
/// signals. Must return a score for every agent key present in its input;
/// zero or negative marks an agent as unreliable.
#[async_trait]
pub trait PerformancePredictor: Send + Sync {
    async fn predict(
        &self,
        signals: &HashMap<String, Signal>,
    ) -> Result<HashMap<String, f64>, AgentError>;
}

/// A `PerformancePredictor` backed by an external command: signals JSON in
/// on stdin, `{agent: score}` JSON out on stdout.
pub struct CommandPredictor {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandPredictor {
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl PerformancePredictor for CommandPredictor {
    async fn predict(
        &self,
        signals: &HashMap<String, Signal>,
    ) -> Result<HashMap<String, f64>, AgentError> {
        debug!(agents = signals.len(), "Requesting performance predictions");

        let payload = serde_json::to_string(signals)?;
        let raw = invoke_command(&self.command, &self.args, &payload, self.timeout).await?;
        let scores = parse_score_map(&raw)?;

        for agent in signals.keys() {
            if !scores.contains_key(agent) {
                return Err(AgentError::Parse(format!(
                    "predictor returned no score for agent {agent}"
                )));
            }
        }

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::make_signal;

    fn signals(agents: &[&str]) -> HashMap<String, Signal> {
        agents
            .iter()
            .map(|a| (a.to_string(), make_signal(a, "2026-08-27 09:30:00")))
            .collect()
    }

    #[tokio::test]
    async fn parses_scores_from_command() {
        let predictor = CommandPredictor::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat >/dev/null; echo '{"momentum_agent": 1.4, "value_agent": -0.2}'"#
                    .to_string(),
            ],
            Duration::from_secs(10),
        );

        let scores = predictor
            .predict(&signals(&["momentum_agent", "value_agent"]))
            .await
            .unwrap();
        assert_eq!(scores["momentum_agent"], 1.4);
        assert_eq!(scores["value_agent"], -0.2);
    }

    #[tokio::test]
    async fn missing_agent_key_is_contract_violation() {
        let predictor = CommandPredictor::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat >/dev/null; echo '{"momentum_agent": 1.4}'"#.to_string(),
            ],
            Duration::from_secs(10),
        );

        let err = predictor
            .predict(&signals(&["momentum_agent", "value_agent"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[tokio::test]
    async fn extra_keys_tolerated() {
        // A predictor may score agents beyond this cycle's set; the
        // optimizer later works off whatever map the engine passes it.
        let predictor = CommandPredictor::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat >/dev/null; echo '{"momentum_agent": 1.0, "retired_agent": 0.5}'"#
                    .to_string(),
            ],
            Duration::from_secs(10),
        );

        let scores = predictor.predict(&signals(&["momentum_agent"])).await.unwrap();
        assert!(scores.contains_key("retired_agent"));
    }
}
