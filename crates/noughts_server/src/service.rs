//! Game service: ties the engine to a store.

use crate::store::{GameId, GameStore, StoreError};
use derive_more::{Display, Error, From};
use noughts_core::{Board, Engine, GameOutcome, MoveError, Move, StrategyMode, Turn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Failure of a service operation.
#[derive(Debug, Display, Error, From)]
pub enum ServiceError {
    /// The human move was rejected by the engine.
    #[display("{_0}")]
    Move(MoveError),
    /// The store failed or the game does not exist.
    #[display("{_0}")]
    Store(StoreError),
}

/// Full history of a game with its current outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    /// Every stored board, oldest first.
    pub boards: Vec<Board>,
    /// Outcome of the latest board.
    pub outcome: GameOutcome,
}

/// Plays games against the configured opponent and records them.
pub struct GameService {
    engine: Engine,
    store: Arc<dyn GameStore>,
    mode: StrategyMode,
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("engine", &self.engine)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl GameService {
    /// Creates a service. `mode` is recorded with each new game.
    #[instrument(skip(engine, store))]
    pub fn new(engine: Engine, store: Arc<dyn GameStore>, mode: StrategyMode) -> Self {
        info!(strategy = engine.strategy().name(), shape = %engine.shape(), "Creating game service");
        Self {
            engine,
            store,
            mode,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Starts a new game and returns its id and opening board.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the game cannot be recorded.
    #[instrument(skip(self))]
    pub fn new_game(&self) -> Result<(GameId, Board), ServiceError> {
        let opening = self
            .engine
            .new_game()
            .last()
            .copied()
            .unwrap_or_else(Board::empty);
        let id = self.store.create_game(self.mode, &opening)?;
        info!(game_id = id, "New game started");
        Ok((id, opening))
    }

    /// Plays the human move `mv` in game `id` and records the new boards.
    ///
    /// A rejected move stores nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Move`] for an illegal move and
    /// [`ServiceError::Store`] if the game is unknown or the store fails.
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn play(&self, id: GameId, mv: Move) -> Result<Turn, ServiceError> {
        if self.store.boards(id)?.is_empty() {
            return Err(StoreError::GameNotFound(id).into());
        }

        let lock = self.lock_for(id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.play_locked(id, mv)
        };
        self.release(id, lock);
        result
    }

    fn play_locked(&self, id: GameId, mv: Move) -> Result<Turn, ServiceError> {
        let history = self.store.boards(id)?;
        let current = history.last().copied().ok_or(StoreError::GameNotFound(id))?;
        debug!(game_id = id, plies = history.len() - 1, board = %current.notation(), "Loaded game");

        let turn = self.engine.play_turn(&current, mv).inspect_err(|e| {
            warn!(game_id = id, error = %e, "Move rejected");
        })?;
        self.store.append(id, history.len(), &turn.boards)?;

        info!(game_id = id, outcome = %turn.outcome, "Move recorded");
        Ok(turn)
    }

    /// Returns the full history of game `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the game is unknown or the store fails.
    #[instrument(skip(self))]
    pub fn view(&self, id: GameId) -> Result<GameView, ServiceError> {
        let boards = self.store.boards(id)?;
        let outcome = boards
            .last()
            .map(Board::outcome)
            .ok_or(StoreError::GameNotFound(id))?;
        Ok(GameView { boards, outcome })
    }

    /// Returns every game id in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<GameId>, ServiceError> {
        Ok(self.store.list_games()?)
    }

    fn lock_for(&self, id: GameId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id).or_default())
    }

    /// Drops this caller's handle and forgets the lock once nobody holds it.
    fn release(&self, id: GameId, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks.get(&id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use noughts_core::{HistoryShape, MinimaxStrategy, Strategy};

    fn service(shape: HistoryShape) -> GameService {
        let strategy: Arc<dyn Strategy> = Arc::new(MinimaxStrategy::new());
        GameService::new(
            Engine::new(strategy, shape),
            Arc::new(MemoryStore::new()),
            StrategyMode::Optimal,
        )
    }

    #[test]
    fn test_new_game_starts_empty() {
        let service = service(HistoryShape::PerPly);
        let (id, board) = service.new_game().unwrap();
        assert_eq!(board, Board::empty());
        let view = service.view(id).unwrap();
        assert_eq!(view.boards, vec![Board::empty()]);
        assert_eq!(view.outcome, GameOutcome::InProgress);
    }

    #[test]
    fn test_play_records_both_plies() {
        let service = service(HistoryShape::PerPly);
        let (id, _) = service.new_game().unwrap();
        let turn = service.play(id, Move::new(1, 1)).unwrap();
        assert_eq!(turn.boards.len(), 2);

        let view = service.view(id).unwrap();
        assert_eq!(view.boards.len(), 3);
        assert_eq!(view.boards[1..], turn.boards[..]);
    }

    #[test]
    fn test_per_turn_records_one_board() {
        let service = service(HistoryShape::PerTurn);
        let (id, _) = service.new_game().unwrap();
        service.play(id, Move::new(0, 0)).unwrap();
        let view = service.view(id).unwrap();
        assert_eq!(view.boards.len(), 2);
        assert_eq!(view.boards[1].filled(), 2);
    }

    #[test]
    fn test_illegal_move_stores_nothing() {
        let service = service(HistoryShape::PerPly);
        let (id, _) = service.new_game().unwrap();
        service.play(id, Move::new(1, 1)).unwrap();

        let err = service.play(id, Move::new(1, 1)).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Move(MoveError::CellOccupied { row: 1, col: 1 })
        ));
        let err = service.play(id, Move::new(3, 0)).unwrap_err();
        assert!(matches!(err, ServiceError::Move(MoveError::OutOfBounds { .. })));
        assert_eq!(service.view(id).unwrap().boards.len(), 3);
    }

    #[test]
    fn test_unknown_game() {
        let service = service(HistoryShape::PerPly);
        assert!(matches!(
            service.play(42, Move::new(0, 0)),
            Err(ServiceError::Store(StoreError::GameNotFound(42)))
        ));
        assert!(matches!(
            service.view(42),
            Err(ServiceError::Store(StoreError::GameNotFound(42)))
        ));
    }

    fn lock_entries(service: &GameService) -> usize {
        service.locks.lock().unwrap().len()
    }

    #[test]
    fn test_unknown_games_leave_no_locks() {
        let service = service(HistoryShape::PerPly);
        for id in 1..=1000 {
            assert!(service.play(id, Move::new(0, 0)).is_err());
        }
        assert_eq!(lock_entries(&service), 0);
    }

    #[test]
    fn test_locks_released_after_each_move() {
        let service = service(HistoryShape::PerPly);
        let (id, _) = service.new_game().unwrap();
        service.play(id, Move::new(1, 1)).unwrap();
        assert!(service.play(id, Move::new(1, 1)).is_err());
        assert_eq!(lock_entries(&service), 0);
    }

    #[test]
    fn test_concurrent_moves_record_one_turn_each() {
        let service = Arc::new(service(HistoryShape::PerPly));
        let (id, _) = service.new_game().unwrap();

        let handles: Vec<_> = [Move::new(0, 0), Move::new(2, 2)]
            .into_iter()
            .map(|mv| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || service.play(id, mv))
            })
            .collect();
        let played = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert!(played >= 1);
        assert_eq!(service.view(id).unwrap().boards.len(), 1 + 2 * played);
        assert_eq!(lock_entries(&service), 0);
    }

    #[test]
    fn test_list_games() {
        let service = service(HistoryShape::PerPly);
        assert!(service.list().unwrap().is_empty());
        let (a, _) = service.new_game().unwrap();
        let (b, _) = service.new_game().unwrap();
        assert_eq!(service.list().unwrap(), vec![a, b]);
    }
}
