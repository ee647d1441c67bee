//! JSON request and response bodies.

use crate::service::GameView;
use crate::store::GameId;
use noughts_core::{Board, GameOutcome, Move, Turn};
use serde::{Deserialize, Serialize};

/// A board as three rows of one-character strings.
pub type BoardRows = [[String; 3]; 3];

/// Renders `board` as rows of `"X"`, `"O"` and `"."`.
pub fn board_rows(board: &Board) -> BoardRows {
    board
        .rows()
        .map(|row| row.map(|cell| cell.symbol().to_string()))
}

/// Winner field: `None`, `"X"`, `"O"` or `"draw"`.
pub fn winner(outcome: GameOutcome) -> Option<String> {
    match outcome {
        GameOutcome::InProgress => None,
        GameOutcome::Draw => Some("draw".to_string()),
        GameOutcome::PlayerWin | GameOutcome::OpponentWin => {
            outcome.winner().map(|mark| mark.to_string())
        }
    }
}

/// Body of `POST /game/{gid}/move`.
///
/// Either `{"x": col, "y": row}` or `{"row": r, "col": c}`, zero-based from
/// the upper left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveRequest {
    /// Column `x`, row `y`.
    Location {
        /// Zero-based column.
        x: usize,
        /// Zero-based row.
        y: usize,
    },
    /// Explicit row and column.
    Cell {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
    },
}

impl MoveRequest {
    /// Returns the requested move.
    pub fn to_move(self) -> Move {
        match self {
            MoveRequest::Location { x, y } => Move::new(y, x),
            MoveRequest::Cell { row, col } => Move::new(row, col),
        }
    }
}

/// Response of `POST /game`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGameResponse {
    /// Id of the new game.
    pub gid: GameId,
    /// Opening board.
    pub board: BoardRows,
}

impl NewGameResponse {
    /// Builds the response for game `gid` starting at `board`.
    pub fn new(gid: GameId, board: &Board) -> Self {
        Self {
            gid,
            board: board_rows(board),
        }
    }
}

/// Response of `POST /game/{gid}/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Boards produced by this turn, oldest first.
    pub boards: Vec<BoardRows>,
    /// Board at the end of the turn.
    pub board: BoardRows,
    /// Winner, if the game is over.
    pub winner: Option<String>,
    /// Outcome after the turn.
    pub outcome: GameOutcome,
}

impl From<&Turn> for TurnResponse {
    fn from(turn: &Turn) -> Self {
        let boards: Vec<BoardRows> = turn.boards.iter().map(board_rows).collect();
        let board = turn
            .last_board()
            .map(board_rows)
            .unwrap_or_else(|| board_rows(&Board::empty()));
        Self {
            boards,
            board,
            winner: winner(turn.outcome),
            outcome: turn.outcome,
        }
    }
}

/// Response of `GET /game/{gid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    /// Every stored board, oldest first.
    pub boards: Vec<BoardRows>,
    /// Winner, if the game is over.
    pub winner: Option<String>,
    /// Current outcome.
    pub outcome: GameOutcome,
}

impl From<&GameView> for GameResponse {
    fn from(view: &GameView) -> Self {
        Self {
            boards: view.boards.iter().map(board_rows).collect(),
            winner: winner(view.outcome),
            outcome: view.outcome,
        }
    }
}
