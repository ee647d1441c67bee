//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use noughts_core::Board;
use tracing::instrument;

use crate::db::{DbError, schema};

/// A stored game.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: i32,
    mode: String,
    created_at: NaiveDateTime,
}

/// Insertable game.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    mode: String,
}

/// One board snapshot of a game, in ply order.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::snapshots)]
#[diesel(belongs_to(GameRow, foreign_key = game_id))]
pub struct Snapshot {
    id: i32,
    game_id: i32,
    ply: i32,
    cells: String,
}

impl Snapshot {
    /// Decodes the stored notation back into a board.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored cells are not a valid board.
    #[instrument(skip(self), fields(game_id = self.game_id, ply = self.ply))]
    pub fn board(&self) -> Result<Board, DbError> {
        Ok(Board::from_notation(&self.cells)?)
    }
}

/// Insertable snapshot.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::snapshots)]
pub struct NewSnapshot {
    game_id: i32,
    ply: i32,
    cells: String,
}

impl NewSnapshot {
    /// Builds the row for `board` stored at position `ply` of game `game_id`.
    pub fn from_board(game_id: i32, ply: i32, board: &Board) -> Self {
        Self::new(game_id, ply, board.notation())
    }
}
