//! Configuration file structure

use crate::agent::protocol::DEFAULT_AGENT_ID;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration (`duel.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agent: AgentConfig,
    pub transcript: TranscriptConfig,
}

/// `[agent]` section — where and how to reach the game agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// HTTP endpoint of the agent call API.
    pub endpoint: String,
    /// Workflow agent identifier sent with every call.
    pub agent_id: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8787/agents/call".to_string(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
            timeout_secs: 60,
        }
    }
}

/// `[transcript]` section — JSONL session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("logs/duel-transcript.jsonl"),
        }
    }
}
