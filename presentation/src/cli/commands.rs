//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for trivia-duel
#[derive(Parser, Debug)]
#[command(name = "trivia-duel")]
#[command(author, version, about = "Two-player trivia duel against a remote question agent")]
#[command(long_about = r#"
Trivia Duel presents one shared game session to two players taking
turns at the same terminal. A remote agent generates the questions,
judges the answers, and keeps score; this client routes each update to
the right player's history and only lets the turn player submit.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./duel.toml         Project-level config
3. ~/.config/trivia-duel/config.toml   Global config

Example:
  trivia-duel
  trivia-duel --endpoint https://agents.example.test/call -vv
"#)]
pub struct Cli {
    /// Agent endpoint URL (overrides configuration)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the welcome banner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Disable the JSONL session transcript
    #[arg(long)]
    pub no_transcript: bool,
}
