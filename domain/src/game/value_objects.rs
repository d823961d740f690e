//! Game value objects — player identity and session correlation

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two fixed player identities.
///
/// The remote agent addresses players by the display strings
/// `"Player 1"` and `"Player 2"`; serde uses the same strings so wire
/// values round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "Player 1")]
    One,
    #[serde(rename = "Player 2")]
    Two,
}

impl Player {
    /// The other player.
    pub fn opponent(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

impl FromStr for Player {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Player 1" => Ok(Player::One),
            "Player 2" => Ok(Player::Two),
            other => Err(DomainError::UnknownPlayer(other.to_string())),
        }
    }
}

/// Opaque session correlation token (Value Object).
///
/// Minted once per session and sent unchanged with every agent call;
/// a late response carrying a stale identity is discarded instead of
/// being applied to a newer session's state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
