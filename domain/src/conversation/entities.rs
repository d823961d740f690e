//! Conversation entities
//!
//! Each player sees an ordered history of the questions posed to them,
//! the answers they sent, and the agent's verdicts. The history is
//! append-only: once an event is in a log it is never mutated or
//! removed. Starting a new session swaps in fresh logs instead of
//! draining the old ones.

use crate::game::value_objects::Player;
use serde::{Deserialize, Serialize};

/// A single display event in a player's conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A question posed to this player.
    Question { text: String },
    /// An answer this player sent, appended before the round-trip
    /// resolves. A failed submission leaves this entry in place.
    SubmittedAnswer { text: String },
    /// The agent's verdict on this player's answer. `text` is the
    /// snapshot's human-readable summary, which may say more than the
    /// raw outcome fields.
    Result { text: String, correct: bool },
}

impl ConversationEvent {
    pub fn question(text: impl Into<String>) -> Self {
        Self::Question { text: text.into() }
    }

    pub fn submitted_answer(text: impl Into<String>) -> Self {
        Self::SubmittedAnswer { text: text.into() }
    }

    pub fn result(text: impl Into<String>, correct: bool) -> Self {
        Self::Result {
            text: text.into(),
            correct,
        }
    }
}

/// Append-only ordered sequence of conversation events (Entity).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    events: Vec<ConversationEvent>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ConversationEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ConversationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationEvent> {
        self.events.last()
    }
}

/// A value held once per player.
///
/// The two players' states never differ in shape, only in identity, so
/// anything player-scoped is one `PerPlayer<T>` rather than two named
/// copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub one: T,
    pub two: T,
}

impl<T> PerPlayer<T> {
    pub fn get(&self, player: Player) -> &T {
        match player {
            Player::One => &self.one,
            Player::Two => &self.two,
        }
    }

    pub fn get_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::One => &mut self.one,
            Player::Two => &mut self.two,
        }
    }
}
