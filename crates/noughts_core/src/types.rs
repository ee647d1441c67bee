//! Core domain types for noughts and crosses.

use serde::{Deserialize, Serialize};

/// Side of the game a mark belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// The human player (X, always moves first).
    #[strum(to_string = "X")]
    Player,
    /// The automated opponent (O).
    #[strum(to_string = "O")]
    Opponent,
}

impl Mark {
    /// Returns the other side.
    pub fn other(self) -> Self {
        match self {
            Mark::Player => Mark::Opponent,
            Mark::Opponent => Mark::Player,
        }
    }

    /// Returns the single-character symbol for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Opponent => 'O',
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell holding a mark.
    Marked(Mark),
}

impl Cell {
    /// Returns the single-character symbol for this cell (`.`, `X` or `O`).
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Marked(mark) => mark.symbol(),
        }
    }

    /// Parses a cell from its symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            'X' => Some(Cell::Marked(Mark::Player)),
            'O' => Some(Cell::Marked(Mark::Opponent)),
            _ => None,
        }
    }

    /// Returns true if the cell holds no mark.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A move: 0-indexed (row, col) coordinates.
///
/// Coordinates are not validated on construction; [`crate::Board::apply`]
/// rejects anything outside the 3x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Row index, 0 at the top.
    pub row: usize,
    /// Column index, 0 at the left.
    pub col: usize,
}

impl Move {
    /// All 9 on-board moves in row-major order.
    pub const ALL: [Move; 9] = [
        Move::new(0, 0),
        Move::new(0, 1),
        Move::new(0, 2),
        Move::new(1, 0),
        Move::new(1, 1),
        Move::new(1, 2),
        Move::new(2, 0),
        Move::new(2, 1),
        Move::new(2, 2),
    ];

    /// Creates a move.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts to a row-major board index, or `None` if off the board.
    pub fn index(self) -> Option<usize> {
        (self.row < 3 && self.col < 3).then_some(self.row * 3 + self.col)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameOutcome {
    /// No line and at least one empty cell.
    InProgress,
    /// The player completed a line.
    PlayerWin,
    /// The opponent completed a line.
    OpponentWin,
    /// Full board with no line.
    Draw,
}

impl GameOutcome {
    /// Returns true once no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }

    /// Returns the winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            GameOutcome::PlayerWin => Some(Mark::Player),
            GameOutcome::OpponentWin => Some(Mark::Opponent),
            GameOutcome::InProgress | GameOutcome::Draw => None,
        }
    }
}
