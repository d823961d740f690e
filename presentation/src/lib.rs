//! Presentation layer for trivia-duel
//!
//! This crate contains the CLI definition, console output formatting,
//! the interactive two-player REPL, and the channel adapter that
//! carries the deferred winner reveal to the terminal.

pub mod cli;
pub mod duel;
pub mod output;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use duel::repl::DuelRepl;
pub use duel::reveal::ChannelWinnerReveal;
pub use output::console::ConsoleFormatter;
