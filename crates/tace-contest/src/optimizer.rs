use std::collections::HashMap;

use crate::error::ContestError;

/// Absolute tolerance on the output weight sum when any score is positive.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Convert predicted risk-adjusted scores into normalized capital weights.
///
/// Agents with a strictly positive score receive weight proportional to it;
/// agents at or below zero receive exactly 0. When no agent scores positive
/// the cycle allocates nothing: every weight is 0, deliberately not an
/// equal split, so an all-unreliable field holds cash rather than spreading
/// capital across bad signals.
///
/// Pure function: no caching, no shared state, safe to call concurrently.
/// Every input key appears in the output.
pub fn optimize(scores: &HashMap<String, f64>) -> Result<HashMap<String, f64>, ContestError> {
    if scores.is_empty() {
        return Err(ContestError::EmptyInput);
    }
    for (agent, score) in scores {
        if !score.is_finite() {
            return Err(ContestError::InvalidScore(agent.clone()));
        }
    }

    let positive_sum: f64 = scores.values().filter(|s| **s > 0.0).sum();

    let weights = scores
        .iter()
        .map(|(agent, score)| {
            let weight = if *score > 0.0 && positive_sum > 0.0 {
                score / positive_sum
            } else {
                0.0
            };
            (agent.clone(), weight)
        })
        .collect();

    Ok(weights)
}
