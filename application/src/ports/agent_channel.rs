//! Agent channel port
//!
//! Defines the interface for talking to the remote trivia authority.
//! The agent owns question generation, answer judging, and scoring;
//! the client sends it free-text instructions scoped to a session and
//! gets back a complete [`GameSnapshot`].

use async_trait::async_trait;
use duel_domain::{GameSnapshot, SessionId};
use thiserror::Error;

/// Errors that can occur during an agent call.
///
/// Transport failures and remote-reported non-success collapse into
/// this one type — the coordinator treats every variant the same way
/// (state untouched, call may be retried).
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Agent reported failure: {0}")]
    AgentStatus(String),

    #[error("Malformed agent response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Channel to the remote game authority.
///
/// Implementations (adapters) live in the infrastructure layer. The
/// caller guarantees at most one call is outstanding at a time; the
/// adapter is responsible for latency and failure handling, never for
/// game semantics.
#[async_trait]
pub trait AgentChannel: Send + Sync {
    /// Send one instruction scoped to `session` and return the
    /// resulting snapshot.
    async fn call(
        &self,
        instruction: &str,
        session: &SessionId,
    ) -> Result<GameSnapshot, ChannelError>;
}
