//! Shared fixtures for unit and integration tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tace_models::{Evidence, Signal, SignalAction, SIGNAL_SCHEMA_VERSION};
use uuid::Uuid;

use crate::actions::{REPORT_NO_ACTION, SUBMIT_SIGNAL};
use crate::error::AgentError;
use crate::predictor::PerformancePredictor;
use crate::runner::{AgentRunner, TurnContext};

/// A plausible buy signal for `agent_id` in the given cycle.
pub fn make_signal(agent_id: &str, trigger_time: &str) -> Signal {
    Signal {
        id: Uuid::new_v4(),
        schema_version: SIGNAL_SCHEMA_VERSION,
        agent_id: agent_id.to_string(),
        trigger_time: trigger_time.to_string(),
        action: SignalAction::Buy,
        instrument_id: "600519.SH".to_string(),
        instrument_name: "Kweichow Moutai".to_string(),
        rationale: "Breakout above 20-day range on rising volume".to_string(),
        evidence: vec![Evidence {
            description: "Close above prior range high".to_string(),
            time: "2026-08-26".to_string(),
            source: "daily_bars".to_string(),
        }],
        limitations: vec!["No earnings visibility until next month".to_string()],
        probability: Decimal::new(62, 2),
        belief: "moderate".to_string(),
        background: "Consumer staples leadership rotation".to_string(),
        evaluation_ref: None,
        created_at: Utc::now(),
    }
}

/// What a `MockRunner` does when its turn comes up.
pub enum MockBehavior {
    /// Submit a signal through the gateway and return it.
    Decide,
    /// Report no-action through the gateway and return None.
    Decline,
    /// Fail before reaching any terminal action.
    Fail,
    /// Sleep for the delay, then decide. Used to trip turn timeouts.
    Slow(Duration),
    /// Block until the cycle's cancellation token fires.
    Hang,
}

/// An in-process `AgentRunner` that still routes its terminal calls through
/// the shared gateway, so tests exercise the full submission pipeline.
pub struct MockRunner {
    pub agent_id: String,
    pub behavior: MockBehavior,
}

impl MockRunner {
    pub fn new(agent_id: &str, behavior: MockBehavior) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            behavior,
        }
    }

    async fn decide(&self, ctx: &TurnContext) -> Result<Option<Signal>, AgentError> {
        let mut turn = ctx.begin_turn(&self.agent_id);
        let signal = make_signal(&self.agent_id, &ctx.trigger_time);
        let invocation = turn
            .invoke(SUBMIT_SIGNAL, serde_json::to_value(&signal)?)
            .await?;
        if !invocation.outcome.is_success() {
            return Err(AgentError::Command(format!(
                "submission not accepted: {:?}",
                invocation.outcome
            )));
        }
        Ok(Some(signal))
    }
}

#[async_trait]
impl AgentRunner for MockRunner {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    async fn run(&self, ctx: &TurnContext) -> Result<Option<Signal>, AgentError> {
        match &self.behavior {
            MockBehavior::Decide => self.decide(ctx).await,
            MockBehavior::Decline => {
                let mut turn = ctx.begin_turn(&self.agent_id);
                turn.invoke(
                    REPORT_NO_ACTION,
                    json!({"agent_id": self.agent_id, "reason": "no edge"}),
                )
                .await?;
                Ok(None)
            }
            MockBehavior::Fail => Err(AgentError::Command("simulated crash".to_string())),
            MockBehavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                self.decide(ctx).await
            }
            MockBehavior::Hang => {
                ctx.cancel.cancelled().await;
                Err(AgentError::Command("cancelled".to_string()))
            }
        }
    }
}

/// A `PerformancePredictor` returning canned scores.
pub struct MockPredictor {
    pub scores: HashMap<String, f64>,
    pub fail: bool,
}

impl MockPredictor {
    pub fn new(scores: &[(&str, f64)]) -> Self {
        Self {
            scores: scores.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            scores: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl PerformancePredictor for MockPredictor {
    async fn predict(
        &self,
        signals: &HashMap<String, Signal>,
    ) -> Result<HashMap<String, f64>, AgentError> {
        if self.fail {
            return Err(AgentError::Command("predictor offline".to_string()));
        }
        for agent in signals.keys() {
            if !self.scores.contains_key(agent) {
                return Err(AgentError::Parse(format!("no canned score for {agent}")));
            }
        }
        Ok(self.scores.clone())
    }
}
