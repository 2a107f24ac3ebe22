use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::GatewayError;
use crate::gateway::{ActionGateway, ActionOutcome, Invocation};

/// Lifecycle of one agent run against the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    Running,
    /// A terminal action completed; carries the name of the action that
    /// ended the turn (a decision submission or a no-action report).
    Terminated { action: String },
    /// Budget exhausted without a terminal action.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    TimedOut,
    Failed,
}

impl From<&ActionOutcome> for OutcomeKind {
    fn from(outcome: &ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Success { .. } => OutcomeKind::Success,
            ActionOutcome::TimedOut { .. } => OutcomeKind::TimedOut,
            ActionOutcome::Failed { .. } => OutcomeKind::Failed,
        }
    }
}

/// One entry in a turn's private call history.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub action: String,
    pub kind: OutcomeKind,
    pub elapsed_ms: u64,
}

/// Tracks one agent's pass through the gateway: deadline, call budget,
/// terminal-state bookkeeping and private call history.
///
/// Exactly one terminal action is honored per turn. Invoking anything after
/// termination is a programming error in the calling loop.
pub struct AgentTurn {
    gateway: Arc<ActionGateway>,
    agent_id: String,
    deadline: Instant,
    calls_remaining: usize,
    state: TurnState,
    history: Vec<CallRecord>,
}

impl AgentTurn {
    pub fn new(
        gateway: Arc<ActionGateway>,
        agent_id: impl Into<String>,
        deadline: Instant,
        max_calls: usize,
    ) -> Self {
        Self {
            gateway,
            agent_id: agent_id.into(),
            deadline,
            calls_remaining: max_calls,
            state: TurnState::Running,
            history: Vec::new(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TurnState::Running
    }

    pub fn history(&self) -> &[CallRecord] {
        &self.history
    }

    /// Mark the turn aborted (caller gave up without a terminal action).
    pub fn abort(&mut self) {
        if self.is_running() {
            debug!(agent = %self.agent_id, "Turn aborted");
            self.state = TurnState::Aborted;
        }
    }

    /// Invoke an action on behalf of this agent.
    ///
    /// A successful terminal action moves the turn to `Terminated` and the
    /// loop must stop, regardless of remaining budget. A terminal action
    /// that timed out or failed leaves the turn running so the agent may
    /// retry within budget.
    pub async fn invoke(
        &mut self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<Invocation, GatewayError> {
        match &self.state {
            TurnState::Running => {}
            TurnState::Terminated { action } => {
                return Err(GatewayError::AlreadyTerminated(action.clone()));
            }
            TurnState::Aborted => {
                return Err(GatewayError::AlreadyTerminated("aborted".to_string()));
            }
        }
        if self.calls_remaining == 0 {
            self.state = TurnState::Aborted;
            return Err(GatewayError::BudgetExhausted);
        }

        // Pre-dispatch failures (unknown action, bad arguments) do not
        // consume call budget or appear in history.
        let invocation = self.gateway.invoke(name, args, self.deadline).await?;
        self.calls_remaining -= 1;
        self.history.push(CallRecord {
            action: invocation.action.clone(),
            kind: OutcomeKind::from(&invocation.outcome),
            elapsed_ms: invocation.elapsed.as_millis() as u64,
        });

        if invocation.terminal && invocation.outcome.is_success() {
            info!(agent = %self.agent_id, action = %invocation.action, "Turn terminated");
            self.state = TurnState::Terminated {
                action: invocation.action.clone(),
            };
        }

        Ok(invocation)
    }
}
