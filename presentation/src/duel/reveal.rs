//! Channel-backed winner reveal adapter.
//!
//! The coordinator fires the deferred reveal from a background task;
//! this adapter forwards it over an unbounded channel so the REPL can
//! pick it up on its own schedule.

use duel_application::WinnerReveal;
use duel_domain::Player;
use tokio::sync::mpsc;

/// `WinnerReveal` implementation that sends the winner to a channel.
pub struct ChannelWinnerReveal {
    tx: mpsc::UnboundedSender<Player>,
}

impl ChannelWinnerReveal {
    /// Create the adapter and the receiving end for the REPL.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Player>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl WinnerReveal for ChannelWinnerReveal {
    fn reveal(&self, winner: Player) {
        // A closed receiver just means the REPL is gone.
        let _ = self.tx.send(winner);
    }
}
