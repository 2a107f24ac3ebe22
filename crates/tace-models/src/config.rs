use serde::{Deserialize, Serialize};

/// Top-level configuration for TACE.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaceConfig {
    pub engine: EngineConfig,
    pub gateway: GatewayConfig,
    pub contest: ContestConfig,
    pub predictor: PredictorConfig,
}

/// Configuration for the contest cycle engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Overall deadline for one contest cycle in seconds. Agents that have
    /// not reached a terminal state by then are treated as aborted.
    pub cycle_timeout_seconds: u64,
    /// Per-agent turn timeout in seconds (subprocess invocation budget).
    pub turn_timeout_seconds: u64,
    /// Maximum gateway calls one agent may make in a single turn.
    pub max_actions_per_turn: usize,
    /// Participating agents.
    pub agents: Vec<AgentConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_timeout_seconds: 300,
            turn_timeout_seconds: 120,
            max_actions_per_turn: 16,
            agents: vec![
                AgentConfig {
                    name: "momentum_agent".to_string(),
                    command: "tace-agent-momentum".to_string(),
                    args: vec![],
                    enabled: true,
                },
                AgentConfig {
                    name: "value_agent".to_string(),
                    command: "tace-agent-value".to_string(),
                    args: vec![],
                    enabled: true,
                },
            ],
        }
    }
}

/// Configuration for one participating agent's runner command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    /// Executable invoked for this agent's turn. Receives the turn request
    /// JSON on stdin and must emit a Signal (or decline) JSON on stdout.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub enabled: bool,
}

/// Defaults applied to actions registered without explicit budgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    pub action_timeout_seconds: u64,
    pub max_output_chars: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            action_timeout_seconds: 30,
            max_output_chars: 20_000,
        }
    }
}

/// Configuration for the contest result store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContestConfig {
    pub results_dir: String,
    /// Label recorded in every persisted result document.
    pub selection_method: String,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            results_dir: "data/contest_results".to_string(),
            selection_method: "sharpe_proportional".to_string(),
        }
    }
}

/// Configuration for the external performance predictor command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictorConfig {
    /// Executable that receives the cycle's signals JSON on stdin and emits
    /// an {agent: score} JSON object on stdout.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub timeout_seconds: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            command: "tace-sharpe-predictor".to_string(),
            args: vec![],
            timeout_seconds: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_tace_config() {
        let config = TaceConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn default_agents_enabled() {
        let engine = EngineConfig::default();
        assert_eq!(engine.agents.len(), 2);
        assert!(engine.agents.iter().all(|a| a.enabled));
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[engine]
cycle_timeout_seconds = 120
turn_timeout_seconds = 45
max_actions_per_turn = 8

[[engine.agents]]
name = "momentum_agent"
command = "/opt/agents/momentum"
args = ["--universe", "cn_a"]
enabled = true

[[engine.agents]]
name = "macro_agent"
command = "/opt/agents/macro"
enabled = false

[gateway]
action_timeout_seconds = 15
max_output_chars = 4000

[contest]
results_dir = "/tmp/contest_results"
selection_method = "sharpe_proportional"

[predictor]
command = "/opt/predictor/sharpe"
timeout_seconds = 30
"#;

        let config: TaceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.agents.len(), 2);
        assert!(!config.engine.agents[1].enabled);
        assert!(config.engine.agents[1].args.is_empty());
        assert_eq!(config.gateway.max_output_chars, 4000);
        assert_eq!(config.contest.results_dir, "/tmp/contest_results");
        assert_eq!(config.predictor.command, "/opt/predictor/sharpe");
    }
}
