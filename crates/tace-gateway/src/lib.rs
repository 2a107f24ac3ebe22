//! Bounded tool-invocation layer for contest agents.
//!
//! Agents call named external actions through a typed registry. Every call
//! runs the same pipeline: validate arguments against the action's schema,
//! execute under a deadline, truncate oversized output, wrap the result in
//! an envelope. Terminal actions end the invoking agent's turn.

pub mod error;
pub mod gateway;
pub mod schema;
pub mod turn;

pub use error::GatewayError;
pub use gateway::{
    ActionGateway, ActionHandler, ActionOutcome, ActionSpec, Invocation, TRUNCATION_MARKER,
};
pub use schema::{ArgumentSchema, FieldKind, FieldSpec};
pub use turn::{AgentTurn, CallRecord, OutcomeKind, TurnState};
