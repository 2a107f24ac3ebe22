use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub const RESULT_SCHEMA_VERSION: u32 = 1;

/// The outcome of one contest cycle: normalized capital weights per agent.
///
/// Built exactly once per cycle, persisted, then immutable. Invariants:
/// weights are non-negative; they sum to 1 (within 1e-9) whenever at least
/// one agent has a strictly positive predicted score, and to 0 otherwise;
/// `valid_signals <= total_signals`; every scored agent appears in `weights`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContestResult {
    pub trigger_time: String,
    pub weights: HashMap<String, f64>,
    pub total_signals: usize,
    /// Count of agents with strictly positive weight.
    pub valid_signals: usize,
    pub selection_method: String,
    /// Judge scores consulted per agent, when a judging step ran.
    pub scores_used: Option<HashMap<String, Vec<f64>>>,
}

/// The JSON document persisted per trigger time.
///
/// Field names are fixed for compatibility with downstream consumers; maps
/// are ordered so the same result always serializes to the same bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultDocument {
    pub schema_version: u32,
    pub trigger_time: String,
    pub optimized_weights: BTreeMap<String, f64>,
    pub predicted_scores: BTreeMap<String, f64>,
    pub summary: ResultSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSummary {
    pub total_signals: usize,
    pub valid_signals: usize,
    pub selection_method: String,
    pub avg_score: f64,
    /// Up to three [agent, score] pairs, best first.
    pub top_score_agents: Vec<(String, f64)>,
    /// Up to three [agent, weight] pairs, heaviest first.
    pub top_weight_agents: Vec<(String, f64)>,
}
