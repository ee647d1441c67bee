//! Error types for move application and board parsing.

use derive_more::{Display, Error};
use serde::Serialize;

/// Error that can occur when applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Coordinates fall outside the 3x3 grid.
    #[display("Move ({row}, {col}) is outside the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a mark.
    #[display("Cell ({row}, {col}) is already occupied")]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The board already has a winner or is full.
    #[display("Game is already over")]
    GameAlreadyOver,
}

impl MoveError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> MoveErrorKind {
        match self {
            MoveError::OutOfBounds { .. } => MoveErrorKind::OutOfBounds,
            MoveError::CellOccupied { .. } => MoveErrorKind::CellOccupied,
            MoveError::GameAlreadyOver => MoveErrorKind::GameAlreadyOver,
        }
    }
}

/// Kind of [`MoveError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MoveErrorKind {
    /// See [`MoveError::OutOfBounds`].
    OutOfBounds,
    /// See [`MoveError::CellOccupied`].
    CellOccupied,
    /// See [`MoveError::GameAlreadyOver`].
    GameAlreadyOver,
}

/// Error parsing a board from its 9-character notation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseBoardError {
    /// Notation is not exactly 9 characters.
    #[display("Board notation must have 9 cells, got {_0}")]
    WrongLength(#[error(not(source))] usize),

    /// A character other than `X`, `O` or `.`.
    #[display("Invalid cell symbol '{_0}'")]
    InvalidSymbol(#[error(not(source))] char),

    /// Mark counts cannot arise from alternating play with X first.
    #[display("Unbalanced marks: {player} X vs {opponent} O")]
    Unbalanced {
        /// Number of player marks.
        player: usize,
        /// Number of opponent marks.
        opponent: usize,
    },
}
