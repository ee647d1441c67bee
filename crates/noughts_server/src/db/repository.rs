//! Database repository for games and their board snapshots.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use noughts_core::{Board, StrategyMode};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRow, NewGame, NewSnapshot, Snapshot, schema};
use crate::store::{GameId, GameStore, StoreError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds SQLite waits on a locked database before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// SQLite-backed [`GameStore`].
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}")).execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Looks up a game. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_game(&self, id: GameId) -> Result<Option<GameRow>, DbError> {
        let mut conn = self.connection()?;
        let game = schema::games::table
            .find(id)
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(game)
    }

    /// Lists all games, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn games(&self) -> Result<Vec<GameRow>, DbError> {
        let mut conn = self.connection()?;
        let games = schema::games::table
            .order(schema::games::id.asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;
        debug!(count = games.len(), "Games loaded");
        Ok(games)
    }

    /// Loads the snapshots of `game`, in ply order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, game), fields(game_id = game.id()))]
    pub fn snapshots(&self, game: &GameRow) -> Result<Vec<Snapshot>, DbError> {
        let mut conn = self.connection()?;
        let snapshots = Snapshot::belonging_to(game)
            .order(schema::snapshots::ply.asc())
            .select(Snapshot::as_select())
            .load(&mut conn)?;
        debug!(count = snapshots.len(), "Snapshots loaded");
        Ok(snapshots)
    }
}

fn to_ply(n: usize) -> Result<i32, DbError> {
    i32::try_from(n).map_err(|_| DbError::new(format!("Ply {n} out of range")))
}

impl GameStore for GameRepository {
    #[instrument(skip(self, initial))]
    fn create_game(&self, mode: StrategyMode, initial: &Board) -> Result<GameId, StoreError> {
        let mut conn = self.connection()?;

        let game = conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let game = diesel::insert_into(schema::games::table)
                .values(&NewGame::new(mode.to_string()))
                .returning(GameRow::as_returning())
                .get_result(conn)?;
            diesel::insert_into(schema::snapshots::table)
                .values(&NewSnapshot::from_board(*game.id(), 0, initial))
                .execute(conn)?;
            Ok(game)
        })?;

        info!(game_id = game.id(), mode = %game.mode(), "Game created");
        Ok(*game.id())
    }

    #[instrument(skip(self, boards), fields(new = boards.len()))]
    fn append(
        &self,
        id: GameId,
        expected_len: usize,
        boards: &[Board],
    ) -> Result<(), StoreError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let exists = schema::games::table
                .find(id)
                .select(schema::games::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(StoreError::GameNotFound(id));
            }

            let stored: i64 = schema::snapshots::table
                .filter(schema::snapshots::game_id.eq(id))
                .count()
                .get_result(conn)?;
            let actual = usize::try_from(stored).unwrap_or(usize::MAX);
            if actual != expected_len {
                warn!(game_id = id, expected_len, actual, "Stale append rejected");
                return Err(StoreError::Conflict {
                    id,
                    expected: expected_len,
                    actual,
                });
            }

            let rows = boards
                .iter()
                .enumerate()
                .map(|(offset, board)| {
                    Ok(NewSnapshot::from_board(id, to_ply(expected_len + offset)?, board))
                })
                .collect::<Result<Vec<_>, DbError>>()?;
            diesel::insert_into(schema::snapshots::table)
                .values(&rows)
                .execute(conn)?;
            Ok(())
        })?;

        debug!(game_id = id, total = expected_len + boards.len(), "Snapshots appended");
        Ok(())
    }

    #[instrument(skip(self))]
    fn boards(&self, id: GameId) -> Result<Vec<Board>, StoreError> {
        let game = self.find_game(id)?.ok_or(StoreError::GameNotFound(id))?;
        let boards = self
            .snapshots(&game)?
            .iter()
            .map(Snapshot::board)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }

    #[instrument(skip(self))]
    fn list_games(&self) -> Result<Vec<GameId>, StoreError> {
        Ok(self.games()?.iter().map(|g| *g.id()).collect())
    }
}
