use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tace_models::contest_result::RESULT_SCHEMA_VERSION;
use tace_models::{ContestResult, ResultDocument, ResultSummary};
use tracing::info;

use crate::error::ContestError;

/// Persists one versioned result document per decision cycle.
///
/// The file name is derived deterministically from the trigger time, so
/// re-running a cycle overwrites the prior document rather than duplicating
/// it. Writes for different trigger times land in different files and never
/// contend; same-time writes are last-writer-wins.
pub struct ResultStore {
    base_dir: PathBuf,
    selection_method: String,
}

impl ResultStore {
    pub fn new(base_dir: impl Into<PathBuf>, selection_method: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            selection_method: selection_method.into(),
        }
    }

    /// Filesystem-safe file name for a trigger time: spaces become `_`,
    /// colons become `-`.
    pub fn file_key(trigger_time: &str) -> String {
        let safe = trigger_time.replace(' ', "_").replace(':', "-");
        format!("contest_result_{safe}.json")
    }

    /// Where the document for `trigger_time` lives (whether or not it
    /// exists yet).
    pub fn document_path(&self, trigger_time: &str) -> PathBuf {
        self.base_dir.join(Self::file_key(trigger_time))
    }

    /// Build the in-memory result without touching the filesystem.
    pub fn build(
        &self,
        trigger_time: &str,
        weights: &HashMap<String, f64>,
        scores: &HashMap<String, f64>,
    ) -> ContestResult {
        ContestResult {
            trigger_time: trigger_time.to_string(),
            weights: weights.clone(),
            total_signals: scores.len(),
            valid_signals: weights.values().filter(|w| **w > 0.0).count(),
            selection_method: self.selection_method.clone(),
            scores_used: None,
        }
    }

    /// Build and persist the result document, creating the destination
    /// directory lazily. Returns the result and the path it was written to.
    pub fn save(
        &self,
        trigger_time: &str,
        weights: &HashMap<String, f64>,
        scores: &HashMap<String, f64>,
    ) -> Result<(ContestResult, PathBuf), ContestError> {
        let result = self.build(trigger_time, weights, scores);
        let document = self.document(&result, scores);

        std::fs::create_dir_all(&self.base_dir)?;
        let path = self.document_path(trigger_time);
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&path, json)?;

        info!(
            trigger_time,
            path = %path.display(),
            valid = result.valid_signals,
            total = result.total_signals,
            "Contest result persisted"
        );
        Ok((result, path))
    }

    fn document(&self, result: &ContestResult, scores: &HashMap<String, f64>) -> ResultDocument {
        let avg_score = if scores.is_empty() {
            0.0
        } else {
            scores.values().sum::<f64>() / scores.len() as f64
        };

        ResultDocument {
            schema_version: RESULT_SCHEMA_VERSION,
            trigger_time: result.trigger_time.clone(),
            optimized_weights: result
                .weights
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            predicted_scores: scores.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            summary: ResultSummary {
                total_signals: result.total_signals,
                valid_signals: result.valid_signals,
                selection_method: result.selection_method.clone(),
                avg_score,
                top_score_agents: top_n(scores, 3),
                top_weight_agents: top_n(&result.weights, 3),
            },
        }
    }
}

/// Highest `n` entries, best first; ties break on agent name for stable
/// documents.
fn top_n(map: &HashMap<String, f64>, n: usize) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    entries.truncate(n);
    entries
}

/// Read a persisted document back. Test and tooling convenience.
pub fn read_document(path: &Path) -> Result<ResultDocument, ContestError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
