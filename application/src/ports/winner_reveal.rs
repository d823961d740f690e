//! Winner reveal port
//!
//! The coordinator defers the blocking "game over" presentation by a
//! fixed grace period so the final result message stays visible for a
//! beat. When the timer fires (and has not been superseded by a new
//! session), the coordinator signals through this port.

use duel_domain::Player;

/// Sink for the deferred winner announcement.
pub trait WinnerReveal: Send + Sync {
    /// Present the winner now.
    fn reveal(&self, winner: Player);
}

/// No-op implementation for tests and headless runs.
pub struct NoWinnerReveal;

impl WinnerReveal for NoWinnerReveal {
    fn reveal(&self, _winner: Player) {}
}
