//! Append-only storage of board snapshots per game.
//!
//! A store never validates boards or computes outcomes; it keeps what the
//! engine produced, in order.

use crate::db::DbError;
use derive_more::{Display, Error};
use noughts_core::{Board, StrategyMode};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Identifier of a stored game.
pub type GameId = i32;

/// Storage failure.
#[derive(Debug, Display, Error)]
pub enum StoreError {
    /// No game with this id.
    #[display("Game {_0} not found")]
    GameNotFound(#[error(not(source))] GameId),

    /// The game changed since it was read.
    #[display("Game {id} has {actual} snapshots, expected {expected}")]
    Conflict {
        /// Game id.
        id: GameId,
        /// Snapshot count the caller read.
        expected: usize,
        /// Snapshot count now stored.
        actual: usize,
    },

    /// Underlying database failure.
    #[display("{_0}")]
    Db(DbError),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::Db(err)
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        StoreError::Db(DbError::from(err))
    }
}

/// Append-ordered board snapshots per game id.
pub trait GameStore: Send + Sync {
    /// Creates a game whose history starts with `initial`.
    fn create_game(&self, mode: StrategyMode, initial: &Board) -> Result<GameId, StoreError>;

    /// Appends `boards` to game `id`.
    ///
    /// `expected_len` is the number of snapshots the caller based the new
    /// boards on; a mismatch fails with [`StoreError::Conflict`] and stores
    /// nothing.
    fn append(&self, id: GameId, expected_len: usize, boards: &[Board])
    -> Result<(), StoreError>;

    /// Returns every snapshot of game `id`, oldest first.
    fn boards(&self, id: GameId) -> Result<Vec<Board>, StoreError>;

    /// Returns the most recent snapshot of game `id`.
    fn latest(&self, id: GameId) -> Result<Board, StoreError> {
        self.boards(id)?
            .last()
            .copied()
            .ok_or(StoreError::GameNotFound(id))
    }

    /// Returns all game ids in creation order.
    fn list_games(&self) -> Result<Vec<GameId>, StoreError>;
}

/// In-process store, used by the terminal mode and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<Vec<Vec<Board>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(id: GameId) -> Option<usize> {
        usize::try_from(id).ok()?.checked_sub(1)
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self, initial))]
    fn create_game(&self, mode: StrategyMode, initial: &Board) -> Result<GameId, StoreError> {
        let mut games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        games.push(vec![*initial]);
        let id = GameId::try_from(games.len())
            .map_err(|_| DbError::new("Game id space exhausted"))?;
        info!(game_id = id, mode = %mode, "Game created in memory");
        Ok(id)
    }

    #[instrument(skip(self, boards), fields(new = boards.len()))]
    fn append(
        &self,
        id: GameId,
        expected_len: usize,
        boards: &[Board],
    ) -> Result<(), StoreError> {
        let mut games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        let history = Self::slot(id)
            .and_then(|i| games.get_mut(i))
            .ok_or(StoreError::GameNotFound(id))?;

        if history.len() != expected_len {
            warn!(game_id = id, expected_len, actual = history.len(), "Stale append rejected");
            return Err(StoreError::Conflict {
                id,
                expected: expected_len,
                actual: history.len(),
            });
        }

        history.extend_from_slice(boards);
        debug!(game_id = id, total = history.len(), "Snapshots appended");
        Ok(())
    }

    fn boards(&self, id: GameId) -> Result<Vec<Board>, StoreError> {
        let games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        Self::slot(id)
            .and_then(|i| games.get(i))
            .cloned()
            .ok_or(StoreError::GameNotFound(id))
    }

    fn list_games(&self) -> Result<Vec<GameId>, StoreError> {
        let games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        (1..=games.len())
            .map(|n| GameId::try_from(n).map_err(|_| DbError::new("Game id out of range").into()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_core::Move;

    #[test]
    fn test_create_and_read_back() {
        let store = MemoryStore::new();
        let id = store
            .create_game(StrategyMode::Optimal, &Board::empty())
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(store.boards(id).unwrap(), vec![Board::empty()]);
        assert_eq!(store.latest(id).unwrap(), Board::empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let store = MemoryStore::new();
        let id = store.create_game(StrategyMode::Random, &Board::empty()).unwrap();
        let a = Board::empty().apply(Move::new(0, 0)).unwrap();
        let b = a.apply(Move::new(1, 1)).unwrap();
        store.append(id, 1, &[a, b]).unwrap();
        assert_eq!(store.boards(id).unwrap(), vec![Board::empty(), a, b]);
        assert_eq!(store.latest(id).unwrap(), b);
    }

    #[test]
    fn test_stale_append_is_conflict() {
        let store = MemoryStore::new();
        let id = store.create_game(StrategyMode::Optimal, &Board::empty()).unwrap();
        let a = Board::empty().apply(Move::new(0, 0)).unwrap();
        store.append(id, 1, &[a]).unwrap();
        let err = store.append(id, 1, &[a]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert_eq!(store.boards(id).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_game() {
        let store = MemoryStore::new();
        assert!(matches!(store.boards(7), Err(StoreError::GameNotFound(7))));
        assert!(matches!(store.boards(0), Err(StoreError::GameNotFound(0))));
        assert!(matches!(
            store.append(-1, 0, &[]),
            Err(StoreError::GameNotFound(-1))
        ));
    }

    #[test]
    fn test_list_in_creation_order() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            store.create_game(StrategyMode::Optimal, &Board::empty()).unwrap();
        }
        assert_eq!(store.list_games().unwrap(), vec![1, 2, 3]);
    }
}
