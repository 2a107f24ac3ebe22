use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;
use tace_gateway::{ActionGateway, AgentTurn};
use tace_models::Signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::actions::{REPORT_NO_ACTION, SUBMIT_SIGNAL};
use crate::command::invoke_command;
use crate::error::AgentError;
use crate::parser::{extract_json, parse_signal};

/// Everything a runner needs for one turn: the cycle key, the shared
/// gateway, the cycle deadline, the per-turn call budget and a token that
/// fires if the engine gives up on the cycle.
#[derive(Clone)]
pub struct TurnContext {
    pub trigger_time: String,
    pub gateway: Arc<ActionGateway>,
    pub deadline: Instant,
    pub max_actions: usize,
    pub cancel: CancellationToken,
}

impl TurnContext {
    /// Start a fresh turn for `agent_id`. Each turn's call history is
    /// private to that run.
    pub fn begin_turn(&self, agent_id: &str) -> AgentTurn {
        AgentTurn::new(
            Arc::clone(&self.gateway),
            agent_id,
            self.deadline,
            self.max_actions,
        )
    }
}

/// Drives one agent's decision loop for a cycle, emitting zero or one
/// Signal.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    fn agent_id(&self) -> &str;

    async fn run(&self, ctx: &TurnContext) -> Result<Option<Signal>, AgentError>;
}

/// An `AgentRunner` backed by an external command.
///
/// The command receives a turn request JSON (agent id, trigger time, action
/// catalog) on stdin and emits either a Signal object or
/// `{"no_action": true, "reason": ...}` on stdout. Whichever it emits, the
/// runner finishes the turn through the matching terminal gateway action so
/// the submission is schema-checked like any other call.
pub struct CommandRunner {
    agent_id: String,
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(
        agent_id: impl Into<String>,
        command: impl Into<String>,
        args: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            command: command.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl AgentRunner for CommandRunner {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    async fn run(&self, ctx: &TurnContext) -> Result<Option<Signal>, AgentError> {
        let mut turn = ctx.begin_turn(&self.agent_id);

        let request = turn_request(&self.agent_id, ctx);
        let raw = invoke_command(
            &self.command,
            &self.args,
            &serde_json::to_string(&request)?,
            self.timeout,
        )
        .await?;

        let json_str = extract_json(&raw)?;
        let value: serde_json::Value = serde_json::from_str(&json_str)?;

        if value.get("no_action").and_then(|v| v.as_bool()).unwrap_or(false) {
            let reason = value
                .get("reason")
                .and_then(|v| v.as_str())
                .unwrap_or("unspecified");
            turn.invoke(
                REPORT_NO_ACTION,
                json!({"agent_id": self.agent_id, "reason": reason}),
            )
            .await?;
            info!(agent = %self.agent_id, reason, "Agent declined to propose");
            return Ok(None);
        }

        let signal = parse_signal(&raw)?;
        if signal.agent_id != self.agent_id {
            return Err(AgentError::Parse(format!(
                "signal agent_id '{}' does not match runner '{}'",
                signal.agent_id, self.agent_id
            )));
        }
        if signal.trigger_time != ctx.trigger_time {
            warn!(
                agent = %self.agent_id,
                stated = %signal.trigger_time,
                expected = %ctx.trigger_time,
                "Signal trigger time differs from cycle"
            );
        }

        let invocation = turn
            .invoke(SUBMIT_SIGNAL, serde_json::to_value(&signal)?)
            .await?;
        if !invocation.outcome.is_success() {
            return Err(AgentError::Command(format!(
                "signal submission did not complete: {:?}",
                invocation.outcome
            )));
        }

        Ok(Some(signal))
    }
}

/// The JSON handed to an agent command on stdin.
fn turn_request(agent_id: &str, ctx: &TurnContext) -> serde_json::Value {
    let actions: Vec<serde_json::Value> = ctx
        .gateway
        .catalog()
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "description": spec.description,
                "schema": spec.schema,
                "terminal": spec.terminal,
            })
        })
        .collect();

    json!({
        "agent_id": agent_id,
        "trigger_time": ctx.trigger_time,
        "actions": actions,
    })
}
