//! Console output formatter for the duel session

use colored::Colorize;
use duel_application::SessionView;
use duel_domain::{ConversationEvent, GameSnapshot, Player, Question};

/// Formats session state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the current question card.
    pub fn format_question(question: &Question) -> String {
        format!(
            "{} {}\n{}\n",
            "Category:".cyan().bold(),
            question.category,
            question.text.bold()
        )
    }

    /// Format one conversation event the way the player sees it.
    pub fn format_event(event: &ConversationEvent) -> String {
        match event {
            ConversationEvent::Question { text } => {
                format!("  {} {}", "Question:".magenta().bold(), text)
            }
            ConversationEvent::SubmittedAnswer { text } => {
                format!("  {} {}", "Your answer:".blue().bold(), text)
            }
            ConversationEvent::Result { text, correct } => {
                let verdict = if *correct {
                    "Correct!".green().bold()
                } else {
                    "Incorrect".red().bold()
                };
                format!("  {verdict} {text}")
            }
        }
    }

    /// Format one player's full conversation history with a header.
    pub fn format_history(view: &SessionView, player: Player) -> String {
        let score = view
            .snapshot
            .as_ref()
            .map(|s| s.scores.for_player(player))
            .unwrap_or(0);
        let mut output = format!("{} ({} pts)\n", player.to_string().yellow().bold(), score);
        for event in view.logs.get(player).events() {
            output.push_str(&Self::format_event(event));
            output.push('\n');
        }
        output
    }

    /// Format the ranked leaderboard with turn and lead markers.
    pub fn format_leaderboard(snapshot: &GameSnapshot) -> String {
        let mut output = format!(
            "{} (Round {})\n",
            "Leaderboard".cyan().bold(),
            snapshot.round
        );
        let leading = snapshot.leaderboard.len() > 1
            && snapshot.leaderboard[0].score > snapshot.leaderboard[1].score;
        for (rank, entry) in snapshot.leaderboard.iter().enumerate() {
            let marker = if snapshot.is_active() && entry.player == snapshot.turn {
                " <- active"
            } else {
                ""
            };
            let trophy = if rank == 0 && leading { " *" } else { "" };
            output.push_str(&format!(
                "  {}. {} - {} pts{}{}\n",
                rank + 1,
                entry.player,
                entry.score,
                trophy,
                marker
            ));
        }
        output
    }

    /// One-line status: round, whose turn, or game over.
    pub fn format_status(snapshot: &GameSnapshot) -> String {
        if snapshot.is_completed() {
            format!("Round {} - Game Over!", snapshot.round)
        } else {
            format!("Round {} - {} to answer", snapshot.round, snapshot.turn)
        }
    }

    /// The deferred winner banner.
    pub fn format_winner_banner(winner: Player, snapshot: Option<&GameSnapshot>) -> String {
        let mut output = String::new();
        output.push_str("+============================================+\n");
        output.push_str(&format!(
            "|  {}  |\n",
            format!("{winner} wins the duel!").yellow().bold()
        ));
        output.push_str("+============================================+\n");
        if let Some(snapshot) = snapshot {
            output.push_str(&format!(
                "Final score: Player 1 {} - {} Player 2\n",
                snapshot.scores.player1, snapshot.scores.player2
            ));
            if !snapshot.message.is_empty() {
                output.push_str(&snapshot.message);
                output.push('\n');
            }
        }
        output
    }
}
