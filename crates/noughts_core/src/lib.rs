//! Noughts and crosses engine.
//!
//! Pure game logic: board values, legal-move enforcement, terminal-state
//! evaluation and the opponent's move selection. No I/O, no shared mutable
//! state; every operation is safe to call concurrently for different games.
//!
//! # Example
//!
//! ```
//! use noughts_core::{Board, Engine, GameOutcome, HistoryShape, Move, StrategyMode};
//!
//! let engine = Engine::new(StrategyMode::Optimal.build(None), HistoryShape::PerPly);
//! let turn = engine.play_turn(&Board::empty(), Move::new(1, 1)).unwrap();
//! assert_eq!(turn.boards.len(), 2);
//! assert_eq!(turn.outcome, GameOutcome::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod engine;
mod error;
mod invariants;
mod rules;
mod strategy;
mod types;

pub use board::Board;
pub use engine::{Engine, HistoryShape, Turn, replay};
pub use error::{MoveError, MoveErrorKind, ParseBoardError};
pub use invariants::{ExclusiveWinner, Invariant, TurnBalance};
pub use rules::{LINES, evaluate, has_won};
pub use strategy::{
    MinimaxStrategy, RandomStrategy, Strategy, StrategyMode, score_for, value,
};
pub use types::{Cell, GameOutcome, Mark, Move};
