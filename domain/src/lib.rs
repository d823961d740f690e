//! Domain layer for trivia-duel
//!
//! This crate contains the game-state and conversation types shared by
//! every other layer. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Snapshot
//!
//! The remote agent is the sole authority on game rules: it generates
//! questions, judges answers, and keeps score. Every successful call
//! returns a complete [`GameSnapshot`] which replaces the previous one
//! wholesale — snapshots are never merged field by field.
//!
//! ## Conversation logs
//!
//! Each of the two players owns an append-only [`ConversationLog`] of
//! [`ConversationEvent`]s. Events are routed by the *subject* named in
//! the snapshot (whose turn, whose answer was judged), not by the
//! player who happened to trigger the call.

pub mod conversation;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use conversation::entities::{ConversationEvent, ConversationLog, PerPlayer};
pub use core::error::DomainError;
pub use game::{
    entities::{
        AnswerOutcome, GameSnapshot, GameStatus, LeaderboardEntry, Question, Scoreboard,
    },
    value_objects::{Player, SessionId},
};
