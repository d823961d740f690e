//! REPL (Read-Eval-Print Loop) for the two-player duel
//!
//! Both players share one terminal and take turns: a plain line is
//! submitted as the turn player's answer. The gating contract from the
//! coordinator's view applies — while a call is in flight or the game
//! is over, input is refused rather than queued.

use crate::output::console::ConsoleFormatter;
use duel_application::{Dispatch, SessionCoordinator};
use duel_domain::{ConversationEvent, Player};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Interactive duel REPL
pub struct DuelRepl {
    coordinator: Arc<SessionCoordinator>,
    reveal_rx: mpsc::UnboundedReceiver<Player>,
    show_banner: bool,
}

impl DuelRepl {
    pub fn new(
        coordinator: Arc<SessionCoordinator>,
        reveal_rx: mpsc::UnboundedReceiver<Player>,
    ) -> Self {
        Self {
            coordinator,
            reveal_rx,
            show_banner: true,
        }
    }

    /// Set whether to show the welcome banner.
    pub fn with_banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("trivia-duel").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        if self.show_banner {
            self.print_welcome();
        }

        // The original client starts a game as soon as it loads.
        self.start_new().await;

        loop {
            self.drain_reveals();

            let readline = rl.readline(&self.prompt());
            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(&line).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(&line);
                    self.submit(&line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err:?}");
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn prompt(&self) -> String {
        match self.coordinator.view().snapshot {
            None => "duel> ".to_string(),
            Some(snapshot) if snapshot.is_completed() => "game over> ".to_string(),
            Some(snapshot) => format!("[{}] > ", snapshot.turn),
        }
    }

    async fn start_new(&mut self) {
        match self.coordinator.start_session().await {
            Ok(Dispatch::Completed) => {
                let view = self.coordinator.view();
                if let Some(snapshot) = &view.snapshot {
                    println!("{}", ConsoleFormatter::format_status(snapshot));
                    if let Some(question) = &snapshot.question {
                        println!("{}", ConsoleFormatter::format_question(question));
                    }
                }
            }
            Ok(Dispatch::Refused) => {
                println!("A request is still in flight; try again in a moment.");
            }
            Err(e) => {
                eprintln!("Could not start a game: {e}");
            }
        }
    }

    async fn submit(&mut self, line: &str) {
        let view = self.coordinator.view();
        let Some(snapshot) = &view.snapshot else {
            println!("No game yet — /new to start one.");
            return;
        };
        if snapshot.is_completed() {
            println!("The game is over — /new to play again.");
            return;
        }
        let player = snapshot.turn;
        if !view.can_submit(player) {
            println!("Hold on — the last request is still in flight.");
            return;
        }

        match self.coordinator.submit_answer(player, line).await {
            Ok(Dispatch::Completed) => self.render_turn_result().await,
            Ok(Dispatch::Refused) => {
                println!("Submission refused — wait for your turn.");
            }
            Err(e) => {
                eprintln!("Request failed: {e}. You can try again.");
            }
        }
    }

    /// Print the verdict on the judged answer, then either the next
    /// question or the deferred winner banner.
    async fn render_turn_result(&mut self) {
        let view = self.coordinator.view();
        let Some(snapshot) = &view.snapshot else {
            return;
        };

        if let Some(outcome) = &snapshot.last_outcome {
            let verdict = ConversationEvent::result(&snapshot.message, outcome.is_correct);
            println!("{}", ConsoleFormatter::format_event(&verdict));
        }

        if snapshot.is_completed() {
            println!("{}", ConsoleFormatter::format_status(snapshot));
            // The reveal is deliberately delayed by the coordinator;
            // wait it out so the banner lands in sequence.
            if let Ok(Some(winner)) =
                tokio::time::timeout(Duration::from_secs(2), self.reveal_rx.recv()).await
            {
                println!(
                    "{}",
                    ConsoleFormatter::format_winner_banner(winner, view.snapshot.as_ref())
                );
            }
            return;
        }

        println!("{}", ConsoleFormatter::format_status(snapshot));
        if let Some(question) = &snapshot.question {
            println!("{}", ConsoleFormatter::format_question(question));
        }
    }

    /// Print any reveal that fired while the prompt was idle.
    fn drain_reveals(&mut self) {
        while let Ok(winner) = self.reveal_rx.try_recv() {
            let view = self.coordinator.view();
            println!(
                "{}",
                ConsoleFormatter::format_winner_banner(winner, view.snapshot.as_ref())
            );
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            Trivia Duel - Two Players        │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Type an answer to submit it for the player whose turn it is.");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /board    - Show the leaderboard");
        println!("  /log      - Show both players' histories");
        println!("  /new      - Start a new game");
        println!("  /quit     - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if the REPL should exit.
    async fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                self.print_welcome();
                false
            }
            "/new" => {
                self.start_new().await;
                false
            }
            "/board" => {
                if let Some(snapshot) = self.coordinator.view().snapshot {
                    print!("{}", ConsoleFormatter::format_leaderboard(&snapshot));
                } else {
                    println!("No game yet — /new to start one.");
                }
                false
            }
            "/log" => {
                let view = self.coordinator.view();
                print!("{}", ConsoleFormatter::format_history(&view, Player::One));
                print!("{}", ConsoleFormatter::format_history(&view, Player::Two));
                false
            }
            _ => {
                println!("Unknown command: {cmd} (/help for commands)");
                false
            }
        }
    }
}
