//! Infrastructure layer for trivia-duel
//!
//! This crate contains adapters that implement the ports defined in
//! the application layer: the HTTP channel to the remote game agent,
//! configuration file loading, and JSONL transcript logging.

pub mod agent;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use agent::{http::HttpAgentChannel, protocol::DEFAULT_AGENT_ID};
pub use config::{AgentConfig, ConfigLoader, FileConfig, TranscriptConfig};
pub use logging::JsonlTranscriptLogger;
