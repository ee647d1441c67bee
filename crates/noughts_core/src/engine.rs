//! Turn orchestration: human move, evaluation, opponent reply.

use crate::board::Board;
use crate::error::MoveError;
use crate::strategy::Strategy;
use crate::types::{GameOutcome, Move};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Which boards a turn reports.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HistoryShape {
    /// One board per individual move (human, then opponent).
    #[default]
    PerPly,
    /// Only the board at the end of the turn.
    PerTurn,
}

/// Boards produced by one turn, plus the resulting outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// New boards, oldest first. Never empty.
    pub boards: Vec<Board>,
    /// Outcome of the last board.
    pub outcome: GameOutcome,
}

impl Turn {
    /// Returns the board at the end of the turn.
    pub fn last_board(&self) -> Option<&Board> {
        self.boards.last()
    }
}

/// The game engine, parameterized by the opponent strategy.
#[derive(Debug, Clone)]
pub struct Engine {
    strategy: Arc<dyn Strategy>,
    shape: HistoryShape,
}

impl Engine {
    /// Creates an engine with the given opponent and output shape.
    #[instrument(skip(strategy), fields(strategy = strategy.name()))]
    pub fn new(strategy: Arc<dyn Strategy>, shape: HistoryShape) -> Self {
        info!(shape = %shape, "Creating engine");
        Self { strategy, shape }
    }

    /// Returns the opponent strategy.
    pub fn strategy(&self) -> &Arc<dyn Strategy> {
        &self.strategy
    }

    /// Returns the history shape.
    pub fn shape(&self) -> HistoryShape {
        self.shape
    }

    /// Starts a game: a sequence holding only the empty board.
    pub fn new_game(&self) -> Vec<Board> {
        vec![Board::empty()]
    }

    /// Plays the human move `mv` on `board`, then the opponent's reply if the
    /// game continues.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if the human move is illegal. Nothing is played
    /// in that case.
    #[instrument(skip(self, board), fields(board = %board.notation(), mv = %mv, strategy = self.strategy.name()))]
    pub fn play_turn(&self, board: &Board, mv: Move) -> Result<Turn, MoveError> {
        let after_human = board.apply(mv)?;
        let mut boards = vec![after_human];

        let mut outcome = after_human.outcome();
        if !outcome.is_terminal() {
            let reply = self.strategy.choose_move(&after_human)?;
            debug!(reply = %reply, "Opponent replied");
            let after_reply = after_human.apply(reply)?;
            outcome = after_reply.outcome();
            boards.push(after_reply);
        }

        let boards: Vec<Board> = match self.shape {
            HistoryShape::PerPly => boards,
            HistoryShape::PerTurn => boards.into_iter().last().into_iter().collect(),
        };

        info!(outcome = %outcome, plies = boards.len(), "Turn played");
        Ok(Turn { boards, outcome })
    }
}

/// Rebuilds the board sequence for an ordered list of moves.
///
/// The first entry is the empty board, followed by one board per move.
///
/// # Errors
///
/// Returns the first [`MoveError`] hit while replaying.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn replay(moves: &[Move]) -> Result<Vec<Board>, MoveError> {
    let mut boards = Vec::with_capacity(moves.len() + 1);
    let mut board = Board::empty();
    boards.push(board);
    for &mv in moves {
        board = board.apply(mv)?;
        boards.push(board);
    }
    Ok(boards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{MinimaxStrategy, RandomStrategy};
    use crate::types::Mark;

    fn optimal(shape: HistoryShape) -> Engine {
        Engine::new(Arc::new(MinimaxStrategy::new()), shape)
    }

    #[test]
    fn test_new_game_is_single_empty_board() {
        let engine = optimal(HistoryShape::PerPly);
        assert_eq!(engine.new_game(), vec![Board::empty()]);
    }

    #[test]
    fn test_turn_reports_both_plies() {
        let engine = optimal(HistoryShape::PerPly);
        let turn = engine.play_turn(&Board::empty(), Move::new(2, 1)).unwrap();
        assert_eq!(turn.boards.len(), 2);
        assert_eq!(turn.boards[0].filled(), 1);
        assert_eq!(turn.boards[1].filled(), 2);
        assert_eq!(turn.boards[1].count(Mark::Opponent), 1);
        assert_eq!(turn.outcome, GameOutcome::InProgress);
    }

    #[test]
    fn test_per_turn_shape_reports_final_board() {
        let engine = optimal(HistoryShape::PerTurn);
        let turn = engine.play_turn(&Board::empty(), Move::new(1, 1)).unwrap();
        assert_eq!(turn.boards.len(), 1);
        assert_eq!(turn.boards[0].filled(), 2);
    }

    #[test]
    fn test_winning_move_skips_reply() {
        let engine = optimal(HistoryShape::PerPly);
        let board: Board = "XX.OO....".parse().unwrap();
        let turn = engine.play_turn(&board, Move::new(0, 2)).unwrap();
        assert_eq!(turn.boards.len(), 1);
        assert_eq!(turn.outcome, GameOutcome::PlayerWin);
    }

    #[test]
    fn test_illegal_move_plays_nothing() {
        let engine = Engine::new(Arc::new(RandomStrategy::seeded(1)), HistoryShape::PerPly);
        let board = Board::empty().apply(Move::new(0, 0)).unwrap();
        let board = board.apply(Move::new(1, 1)).unwrap();
        assert_eq!(
            engine.play_turn(&board, Move::new(1, 1)),
            Err(MoveError::CellOccupied { row: 1, col: 1 })
        );
    }

    #[test]
    fn test_replay_builds_one_board_per_move() {
        let moves = [Move::new(1, 1), Move::new(0, 0), Move::new(2, 2)];
        let boards = replay(&moves).unwrap();
        assert_eq!(boards.len(), 4);
        assert_eq!(boards[0], Board::empty());
        assert_eq!(boards[3].notation(), "O...X...X");
    }

    #[test]
    fn test_replay_rejects_illegal_history() {
        let moves = [Move::new(1, 1), Move::new(1, 1)];
        assert_eq!(
            replay(&moves),
            Err(MoveError::CellOccupied { row: 1, col: 1 })
        );
    }
}
