//! Application layer for trivia-duel
//!
//! This crate contains the session coordinator and the port
//! definitions it depends on. It depends only on the domain layer.

pub mod ports;
pub mod session;

// Re-export commonly used types
pub use ports::{
    agent_channel::{AgentChannel, ChannelError},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
    winner_reveal::{NoWinnerReveal, WinnerReveal},
};
pub use session::coordinator::{
    Dispatch, SessionCoordinator, SessionError, SessionView, START_INSTRUCTION,
};
