//! Uniform random opponent.

use super::Strategy;
use crate::board::Board;
use crate::error::MoveError;
use crate::types::Move;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Picks uniformly among the legal moves.
pub struct RandomStrategy {
    rng: Mutex<StdRng>,
}

impl RandomStrategy {
    /// Creates a strategy seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a reproducible strategy.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomStrategy").finish_non_exhaustive()
    }
}

impl Strategy for RandomStrategy {
    fn choose_move(&self, board: &Board) -> Result<Move, MoveError> {
        let moves = board.legal_moves();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let choice = moves
            .choose(&mut *rng)
            .copied()
            .ok_or(MoveError::GameAlreadyOver)?;
        debug!(mv = %choice, options = moves.len(), "Random move chosen");
        Ok(choice)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
