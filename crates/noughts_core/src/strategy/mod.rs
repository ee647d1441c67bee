//! Opponent move selection.
//!
//! A [`Strategy`] is chosen once (usually from configuration through
//! [`StrategyMode`]) and injected into the [`crate::Engine`].

mod minimax;
mod random;

pub use minimax::{MinimaxStrategy, score_for, value};
pub use random::RandomStrategy;

use crate::board::Board;
use crate::error::MoveError;
use crate::types::Move;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Policy that picks the next move for the side to move.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// Chooses a move for `board.to_move()`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameAlreadyOver`] if the board is terminal.
    fn choose_move(&self, board: &Board) -> Result<Move, MoveError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Which opponent strategy the engine runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StrategyMode {
    /// Uniformly random legal moves.
    Random,
    /// Full-depth minimax; never loses.
    #[default]
    #[serde(alias = "perfect")]
    #[strum(to_string = "optimal", serialize = "perfect")]
    Optimal,
}

impl StrategyMode {
    /// Builds the strategy for this mode.
    ///
    /// `seed` makes the random strategy reproducible; the optimal strategy
    /// ignores it.
    #[instrument]
    pub fn build(self, seed: Option<u64>) -> Arc<dyn Strategy> {
        info!(mode = %self, "Building opponent strategy");
        match self {
            StrategyMode::Random => match seed {
                Some(seed) => Arc::new(RandomStrategy::seeded(seed)),
                None => Arc::new(RandomStrategy::new()),
            },
            StrategyMode::Optimal => Arc::new(MinimaxStrategy::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parses_case_insensitively() {
        assert_eq!("random".parse::<StrategyMode>().unwrap(), StrategyMode::Random);
        assert_eq!("Optimal".parse::<StrategyMode>().unwrap(), StrategyMode::Optimal);
        assert_eq!("perfect".parse::<StrategyMode>().unwrap(), StrategyMode::Optimal);
        assert!("clever".parse::<StrategyMode>().is_err());
        assert_eq!(StrategyMode::Optimal.to_string(), "optimal");
    }

    #[test]
    fn test_mode_builds_matching_strategy() {
        assert_eq!(StrategyMode::Random.build(Some(1)).name(), "random");
        assert_eq!(StrategyMode::Optimal.build(None).name(), "minimax");
    }

    #[test]
    fn test_default_mode_is_optimal() {
        assert_eq!(StrategyMode::default(), StrategyMode::Optimal);
    }
}
