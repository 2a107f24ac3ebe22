use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tace_gateway::{
    ActionGateway, ActionHandler, ActionSpec, ArgumentSchema, FieldKind, GatewayError,
};
use tace_models::GatewayConfig;

/// Terminal action: submit the final trading signal for this cycle.
pub const SUBMIT_SIGNAL: &str = "submit_signal";
/// Terminal action: decline to propose anything this cycle.
pub const REPORT_NO_ACTION: &str = "report_no_action";

struct AckHandler {
    message: &'static str,
}

#[async_trait]
impl ActionHandler for AckHandler {
    async fn call(&self, _args: serde_json::Value) -> anyhow::Result<String> {
        Ok(self.message.to_string())
    }
}

/// Register the engine's built-in terminal actions.
///
/// Both are sinks: the runner keeps the parsed signal itself, the gateway
/// call exists so submissions go through the same validate/terminal
/// pipeline as every other action.
pub fn register_builtin_actions(
    gateway: &mut ActionGateway,
    config: &GatewayConfig,
) -> Result<(), GatewayError> {
    let timeout = Duration::from_secs(config.action_timeout_seconds);

    gateway.register(
        ActionSpec {
            name: SUBMIT_SIGNAL.to_string(),
            description: "Submit the final trading signal and end the turn".to_string(),
            schema: signal_schema(),
            timeout,
            max_output_chars: config.max_output_chars,
            terminal: true,
        },
        Arc::new(AckHandler {
            message: "signal recorded",
        }),
    )?;

    gateway.register(
        ActionSpec {
            name: REPORT_NO_ACTION.to_string(),
            description: "Report that no trade is proposed this cycle and end the turn"
                .to_string(),
            schema: ArgumentSchema::new()
                .field("agent_id", FieldKind::String)
                .optional("reason", FieldKind::String),
            timeout,
            max_output_chars: config.max_output_chars,
            terminal: true,
        },
        Arc::new(AckHandler {
            message: "no-action recorded",
        }),
    )?;

    Ok(())
}

/// Required shape of a submitted signal.
///
/// `probability` is a Decimal and rides as a string on the wire. Fields
/// beyond these (belief, background, evidence details) are carried in the
/// same object and ignored by validation per gateway policy.
fn signal_schema() -> ArgumentSchema {
    ArgumentSchema::new()
        .field("agent_id", FieldKind::String)
        .field("trigger_time", FieldKind::String)
        .field("action", FieldKind::String)
        .field("instrument_id", FieldKind::String)
        .field("rationale", FieldKind::String)
        .field("probability", FieldKind::String)
        .optional("evidence", FieldKind::Array)
        .optional("limitations", FieldKind::Array)
}
