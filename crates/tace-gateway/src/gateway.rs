use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::schema::ArgumentSchema;

pub const TRUNCATION_MARKER: &str = "... [output truncated]";

/// Registration record for a named action.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub name: String,
    pub description: String,
    pub schema: ArgumentSchema,
    /// Per-call execution budget.
    pub timeout: Duration,
    /// Successful output longer than this is cut and marked.
    pub max_output_chars: usize,
    /// Terminal actions end the invoking agent's turn.
    pub terminal: bool,
}

/// The work behind a registered action. Errors are captured into the
/// invocation envelope, never propagated to the agent loop.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn call(&self, args: serde_json::Value) -> anyhow::Result<String>;
}

/// Result envelope of one action execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success { text: String, truncated: bool },
    TimedOut { budget: Duration },
    Failed { message: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success { .. })
    }
}

/// One completed pass through the invocation pipeline.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub action: String,
    pub terminal: bool,
    pub outcome: ActionOutcome,
    pub elapsed: Duration,
}

struct RegisteredAction {
    spec: ActionSpec,
    handler: Arc<dyn ActionHandler>,
}

/// Validates, dispatches, times out and truncates calls to named actions.
///
/// Every registered action goes through the same fixed pipeline:
/// validate arguments, execute under `min(action timeout, remaining
/// deadline)`, truncate oversized output, wrap the result in an envelope.
/// A slow or failing handler never blocks the caller past its budget and
/// never aborts the agent loop.
#[derive(Default)]
pub struct ActionGateway {
    actions: HashMap<String, RegisteredAction>,
}

impl ActionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action once. Fully validated here, never via runtime
    /// introspection later.
    pub fn register(
        &mut self,
        spec: ActionSpec,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), GatewayError> {
        if spec.name.trim().is_empty() {
            return Err(GatewayError::Registration(
                "action name must not be empty".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for field in &spec.schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(GatewayError::Registration(format!(
                    "duplicate schema field '{}' on action {}",
                    field.name, spec.name
                )));
            }
        }
        if self.actions.contains_key(&spec.name) {
            return Err(GatewayError::DuplicateAction(spec.name));
        }
        debug!(action = %spec.name, terminal = spec.terminal, "Registered action");
        self.actions
            .insert(spec.name.clone(), RegisteredAction { spec, handler });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn is_terminal(&self, name: &str) -> Result<bool, GatewayError> {
        self.actions
            .get(name)
            .map(|a| a.spec.terminal)
            .ok_or_else(|| GatewayError::UnknownAction(name.to_string()))
    }

    /// Registered action specs, sorted by name.
    pub fn catalog(&self) -> Vec<&ActionSpec> {
        let mut specs: Vec<&ActionSpec> = self.actions.values().map(|a| &a.spec).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Run one action through the invocation pipeline.
    ///
    /// Unknown names and schema mismatches fail before dispatch (the handler
    /// must not run). Timeouts and handler errors come back inside the
    /// envelope. The handler future is dropped when its budget expires,
    /// cancelling any work it still holds.
    pub async fn invoke(
        &self,
        name: &str,
        args: serde_json::Value,
        deadline: Instant,
    ) -> Result<Invocation, GatewayError> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| GatewayError::UnknownAction(name.to_string()))?;

        action
            .spec
            .schema
            .validate(&args)
            .map_err(|reason| GatewayError::SchemaValidation {
                action: name.to_string(),
                reason,
            })?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        let budget = action.spec.timeout.min(remaining);
        let started = Instant::now();

        let outcome = if budget.is_zero() {
            warn!(action = name, "Deadline already passed, skipping dispatch");
            ActionOutcome::TimedOut { budget }
        } else {
            match tokio::time::timeout(budget, action.handler.call(args)).await {
                Ok(Ok(text)) => {
                    let (text, truncated) = truncate_output(text, action.spec.max_output_chars);
                    ActionOutcome::Success { text, truncated }
                }
                Ok(Err(e)) => {
                    warn!(action = name, error = %e, "Action handler failed");
                    ActionOutcome::Failed {
                        message: e.to_string(),
                    }
                }
                Err(_) => {
                    warn!(action = name, budget_ms = budget.as_millis(), "Action timed out");
                    ActionOutcome::TimedOut { budget }
                }
            }
        };

        Ok(Invocation {
            action: name.to_string(),
            terminal: action.spec.terminal,
            outcome,
            elapsed: started.elapsed(),
        })
    }
}

/// Cut `text` to at most `max_chars` characters, appending a marker when cut.
fn truncate_output(text: String, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text, false);
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str(TRUNCATION_MARKER);
    (cut, true)
}
