//! Wire protocol for the remote game agent.
//!
//! The agent accepts `{ instruction, agent_id, context: { session_id } }`
//! and answers with an envelope `{ success, response: { status, result } }`.
//! Only `success == true` with `status == "success"` and a parseable
//! game snapshot counts as success; every other shape collapses into a
//! uniform [`ChannelError`].

use duel_application::ChannelError;
use duel_domain::GameSnapshot;
use serde::{Deserialize, Serialize};

/// Agent identifier from the original workflow contract.
pub const DEFAULT_AGENT_ID: &str = "69787493a75ef8a94cc4f20c";

/// Outbound call body.
#[derive(Debug, Serialize)]
pub struct AgentCallRequest<'a> {
    pub instruction: &'a str,
    pub agent_id: &'a str,
    pub context: CallContext<'a>,
}

#[derive(Debug, Serialize)]
pub struct CallContext<'a> {
    pub session_id: &'a str,
}

/// Inbound response envelope.
#[derive(Debug, Deserialize)]
pub struct AgentEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<AgentReply>,
}

#[derive(Debug, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl AgentEnvelope {
    /// Normalize the envelope into a snapshot or a uniform failure.
    pub fn into_snapshot(self) -> Result<GameSnapshot, ChannelError> {
        if !self.success {
            return Err(ChannelError::AgentStatus(
                "agent reported failure".to_string(),
            ));
        }
        let reply = self
            .response
            .ok_or_else(|| ChannelError::MalformedResponse("missing response body".to_string()))?;
        if reply.status != "success" {
            return Err(ChannelError::AgentStatus(reply.status));
        }
        let result = reply
            .result
            .ok_or_else(|| ChannelError::MalformedResponse("missing result".to_string()))?;
        serde_json::from_value(result).map_err(|e| ChannelError::MalformedResponse(e.to_string()))
    }
}
