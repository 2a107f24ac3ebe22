use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SIGNAL_SCHEMA_VERSION: u32 = 1;

/// Proposed direction for the instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

/// One piece of evidence an agent cites in support of its signal.
///
/// `time` is free text as stated by the agent (a date, a quarter, "this
/// morning") and is not parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evidence {
    pub description: String,
    pub time: String,
    pub source: String,
}

/// An agent's structured trading proposal for one contest cycle.
///
/// Produced once per agent per cycle by its runner and immutable afterwards.
/// The `trigger_time` string is the cycle key (e.g. "2026-08-27 09:30:00")
/// and ties the signal to the cycle that owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub id: Uuid,
    pub schema_version: u32,
    pub agent_id: String,
    pub trigger_time: String,
    pub action: SignalAction,
    pub instrument_id: String,
    pub instrument_name: String,
    pub rationale: String,
    /// Ordered list, most load-bearing evidence first.
    pub evidence: Vec<Evidence>,
    /// Limitations the agent itself stated about its analysis.
    pub limitations: Vec<String>,
    /// 0.0 to 1.0 probability the agent assigns to its thesis.
    pub probability: Decimal,
    /// Free-form conviction label (e.g. "high", "speculative").
    pub belief: String,
    pub background: String,
    /// Optional pointer to supporting evaluation data (report id, path).
    pub evaluation_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An external judge's evaluation of a single signal.
///
/// Consumed only as predictor input; zero or more per signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeScore {
    pub judge_id: String,
    /// 0 to 100.
    pub score: f64,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_signal() -> Signal {
        Signal {
            id: Uuid::new_v4(),
            schema_version: SIGNAL_SCHEMA_VERSION,
            agent_id: "momentum_agent".to_string(),
            trigger_time: "2026-08-27 09:30:00".to_string(),
            action: SignalAction::Buy,
            instrument_id: "600519.SH".to_string(),
            instrument_name: "Kweichow Moutai".to_string(),
            rationale: "Breakout above 20-day range on rising volume".to_string(),
            evidence: vec![
                Evidence {
                    description: "Close above prior range high".to_string(),
                    time: "2026-08-26".to_string(),
                    source: "daily_bars".to_string(),
                },
                Evidence {
                    description: "Northbound inflow three sessions running".to_string(),
                    time: "this week".to_string(),
                    source: "flow_data".to_string(),
                },
            ],
            limitations: vec!["No earnings visibility until next month".to_string()],
            probability: dec!(0.62),
            belief: "moderate".to_string(),
            background: "Consumer staples leadership rotation".to_string(),
            evaluation_ref: Some("eval/momentum_agent/2026-08-27.json".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn roundtrip_signal() {
        let signal = sample_signal();
        let json = serde_json::to_string(&signal).unwrap();
        let deserialized: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(signal, deserialized);
    }

    #[test]
    fn signal_action_serialization() {
        assert_eq!(serde_json::to_string(&SignalAction::Buy).unwrap(), "\"buy\"");
        assert_eq!(
            serde_json::to_string(&SignalAction::Sell).unwrap(),
            "\"sell\""
        );
        assert_eq!(
            serde_json::to_string(&SignalAction::Hold).unwrap(),
            "\"hold\""
        );
    }

    #[test]
    fn signal_without_evaluation_ref() {
        let mut signal = sample_signal();
        signal.evaluation_ref = None;
        let json = serde_json::to_string(&signal).unwrap();
        let deserialized: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.evaluation_ref, None);
    }

    #[test]
    fn roundtrip_judge_score() {
        let score = JudgeScore {
            judge_id: "risk_judge".to_string(),
            score: 72.5,
            reasoning: "Well-evidenced thesis but crowded positioning".to_string(),
        };
        let json = serde_json::to_string(&score).unwrap();
        let deserialized: JudgeScore = serde_json::from_str(&json).unwrap();
        assert_eq!(score, deserialized);
    }
}
