//! Game snapshot entities
//!
//! These structs mirror the remote agent's wire format field for field
//! (`game_status`, `current_turn`, `last_answer_result`, ...). Rust
//! field names are the shorter internal ones; serde renames bridge the
//! gap so a snapshot deserializes straight off the wire.

use crate::core::error::DomainError;
use crate::game::value_objects::Player;
use serde::{Deserialize, Serialize};

/// Whether the game accepts further answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

/// The question currently posed to the turn player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub category: String,
}

/// The agent's judgement of the most recent submission.
///
/// Produced only by the remote authority; present in a snapshot only
/// when a submission was just judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub player: Player,
    pub answer_given: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub points_awarded: i64,
}

/// Both players' scores, monotonically non-decreasing per player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub player1: i64,
    pub player2: i64,
}

impl Scoreboard {
    pub fn for_player(&self, player: Player) -> i64 {
        match player {
            Player::One => self.player1,
            Player::Two => self.player2,
        }
    }
}

/// One row of the ranked leaderboard (rank order, 0..=2 entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: Player,
    pub score: i64,
}

/// The authoritative game state returned after every agent call.
///
/// Always applied wholesale: the coordinator replaces its prior
/// snapshot with this one and never merges fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(rename = "game_status")]
    pub status: GameStatus,
    #[serde(rename = "current_round")]
    pub round: u32,
    #[serde(rename = "current_turn")]
    pub turn: Player,
    #[serde(default)]
    pub question: Option<Question>,
    #[serde(rename = "last_answer_result", default)]
    pub last_outcome: Option<AnswerOutcome>,
    pub scores: Scoreboard,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub winner: Option<Player>,
    #[serde(rename = "game_message", default)]
    pub message: String,
}

impl GameSnapshot {
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    /// Check the cross-field invariants the agent contract promises:
    /// a completed game names a winner, an in-progress game poses a
    /// question.
    ///
    /// The agent is authoritative, so a violation is reported rather
    /// than rejected — callers log it and apply the snapshot anyway.
    pub fn check_consistency(&self) -> Result<(), DomainError> {
        match self.status {
            GameStatus::Completed if self.winner.is_none() => {
                Err(DomainError::CompletedWithoutWinner)
            }
            GameStatus::InProgress if self.question.is_none() => {
                Err(DomainError::InProgressWithoutQuestion)
            }
            _ => Ok(()),
        }
    }
}
