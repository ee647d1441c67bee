//! Command-line interface for noughts.

use crate::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use noughts_core::{HistoryShape, StrategyMode};
use std::path::PathBuf;

/// Noughts - play noughts and crosses against an unbeatable opponent
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Noughts and crosses game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve(ServeArgs),

    /// Play in the terminal
    Play {
        /// Opponent strategy (random or optimal)
        #[arg(long, default_value = "optimal")]
        mode: StrategyMode,

        /// Seed for the random opponent
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Flags of the `serve` command. Unset flags fall back to the environment,
/// then the config file, then defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the database file (created if it doesn't exist)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Opponent strategy (random or optimal)
    #[arg(long)]
    pub mode: Option<StrategyMode>,

    /// Boards recorded per turn (per_ply or per_turn)
    #[arg(long)]
    pub history: Option<HistoryShape>,

    /// Seed for the random opponent
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ServeArgs {
    /// Returns the flags that override lower configuration layers.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            mode: self.mode,
            history: self.history,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::parse_from([
            "noughts", "serve", "--port", "8080", "--mode", "random", "--history", "per_turn",
        ]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.port, Some(8080));
        assert_eq!(overrides.mode, Some(StrategyMode::Random));
        assert_eq!(overrides.history, Some(HistoryShape::PerTurn));
        assert_eq!(overrides.host, None);
    }

    #[test]
    fn test_parse_play_defaults() {
        let cli = Cli::parse_from(["noughts", "play"]);
        assert!(matches!(
            cli.command,
            Command::Play {
                mode: StrategyMode::Optimal,
                seed: None
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["noughts", "play", "--mode", "clever"]).is_err());
    }
}
