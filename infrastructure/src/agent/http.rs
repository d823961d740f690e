//! HTTP implementation of the agent channel port.

use crate::agent::protocol::{AgentCallRequest, AgentEnvelope, CallContext, DEFAULT_AGENT_ID};
use async_trait::async_trait;
use duel_application::{AgentChannel, ChannelError};
use duel_domain::{GameSnapshot, SessionId};
use std::time::Duration;
use tracing::debug;

/// Agent channel over HTTP POST.
///
/// One call per request; the coordinator guarantees at most one is
/// outstanding, so no connection pooling tuning is needed beyond
/// reqwest's defaults.
pub struct HttpAgentChannel {
    client: reqwest::Client,
    endpoint: String,
    agent_id: String,
}

impl HttpAgentChannel {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
        })
    }

    /// Override the fixed agent id (normally the workflow default).
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_request_error(e: reqwest::Error) -> ChannelError {
        if e.is_timeout() {
            ChannelError::Timeout
        } else {
            ChannelError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl AgentChannel for HttpAgentChannel {
    async fn call(
        &self,
        instruction: &str,
        session: &SessionId,
    ) -> Result<GameSnapshot, ChannelError> {
        let request = AgentCallRequest {
            instruction,
            agent_id: &self.agent_id,
            context: CallContext {
                session_id: session.as_str(),
            },
        };
        debug!(endpoint = %self.endpoint, session = %session, "calling game agent");

        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(&request)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = response
            .error_for_status()
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let envelope: AgentEnvelope = response
            .json()
            .await
            .map_err(|e| ChannelError::MalformedResponse(e.to_string()))?;

        envelope.into_snapshot()
    }
}
