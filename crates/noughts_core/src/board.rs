//! The 3x3 board value.

use crate::error::{MoveError, ParseBoardError};
use crate::invariants::{ExclusiveWinner, Invariant, TurnBalance};
use crate::rules;
use crate::types::{Cell, GameOutcome, Mark, Move};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

/// 3x3 noughts and crosses board.
///
/// Boards are plain values: [`Board::apply`] returns a new board and leaves
/// the original untouched. Whose turn it is comes from the number of filled
/// cells, since the player always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the cell at `mv`, or `None` if off the board.
    pub fn get(&self, mv: Move) -> Option<Cell> {
        mv.index().map(|i| self.cells[i])
    }

    /// Returns the cells grouped into rows.
    pub fn rows(&self) -> [[Cell; 3]; 3] {
        let c = &self.cells;
        [[c[0], c[1], c[2]], [c[3], c[4], c[5]], [c[6], c[7], c[8]]]
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == Cell::Marked(mark))
            .count()
    }

    /// Number of non-empty cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Checks if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.filled() == 9
    }

    /// Returns the side to move next.
    pub fn to_move(&self) -> Mark {
        if self.filled() % 2 == 0 {
            Mark::Player
        } else {
            Mark::Opponent
        }
    }

    /// Evaluates the board. See [`rules::evaluate`].
    pub fn outcome(&self) -> GameOutcome {
        rules::evaluate(self)
    }

    /// Returns every empty cell in row-major order.
    ///
    /// Terminal boards still report their empty cells; use [`Board::outcome`]
    /// to decide whether moves are accepted.
    pub fn empty_cells(&self) -> Vec<Move> {
        Move::ALL
            .iter()
            .copied()
            .filter(|mv| self.get(*mv) == Some(Cell::Empty))
            .collect()
    }

    /// Returns the moves accepted by [`Board::apply`]: empty cells while the
    /// game is in progress, nothing once it is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.outcome().is_terminal() {
            Vec::new()
        } else {
            self.empty_cells()
        }
    }

    /// Places the mark of the side to move at `mv`, returning the new board.
    ///
    /// # Errors
    ///
    /// - [`MoveError::OutOfBounds`] if `mv` is outside the grid.
    /// - [`MoveError::GameAlreadyOver`] if the board is already terminal.
    /// - [`MoveError::CellOccupied`] if the cell is taken.
    #[instrument(level = "debug", skip(self), fields(board = %self.notation(), mv = %mv))]
    pub fn apply(self, mv: Move) -> Result<Board, MoveError> {
        let index = mv.index().ok_or(MoveError::OutOfBounds {
            row: mv.row,
            col: mv.col,
        })?;

        if self.outcome().is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }

        if !self.cells[index].is_empty() {
            return Err(MoveError::CellOccupied {
                row: mv.row,
                col: mv.col,
            });
        }

        let mark = self.to_move();
        let next = self.place(index, mark);
        debug!(mark = %mark, next = %next.notation(), "Move applied");

        debug_assert!(TurnBalance::holds(&next), "{}", TurnBalance::description());
        debug_assert!(ExclusiveWinner::holds(&next), "{}", ExclusiveWinner::description());

        Ok(next)
    }

    /// Applies a move without legality checks.
    ///
    /// Only used by the search, which walks empty cells of in-progress boards.
    pub(crate) fn place(mut self, index: usize, mark: Mark) -> Board {
        self.cells[index] = Cell::Marked(mark);
        self
    }

    /// Returns the compact 9-character row-major notation (`X`, `O`, `.`).
    pub fn notation(&self) -> String {
        self.cells.iter().map(|c| c.symbol()).collect()
    }

    /// Parses a board from its 9-character notation.
    ///
    /// # Errors
    ///
    /// Returns [`ParseBoardError`] if the length or a symbol is wrong, or
    /// the mark counts cannot come from alternating play.
    #[instrument(level = "debug")]
    pub fn from_notation(s: &str) -> Result<Self, ParseBoardError> {
        let symbols: Vec<char> = s.chars().collect();
        if symbols.len() != 9 {
            return Err(ParseBoardError::WrongLength(symbols.len()));
        }

        let mut cells = [Cell::Empty; 9];
        for (cell, c) in cells.iter_mut().zip(symbols) {
            *cell = Cell::from_symbol(c).ok_or(ParseBoardError::InvalidSymbol(c))?;
        }

        let board = Self { cells };
        if !TurnBalance::holds(&board) {
            return Err(ParseBoardError::Unbalanced {
                player: board.count(Mark::Player),
                opponent: board.count(Mark::Opponent),
            });
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.notation()
    }
}

impl TryFrom<String> for Board {
    type Error = ParseBoardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_notation(&s)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, row) in self.rows().iter().enumerate() {
            let line: Vec<String> = row.iter().map(|c| c.symbol().to_string()).collect();
            write!(f, "{}", line.join("|"))?;
            if r < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}
