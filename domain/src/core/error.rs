//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Completed snapshot has no winner")]
    CompletedWithoutWinner,

    #[error("In-progress snapshot has no question")]
    InProgressWithoutQuestion,
}
