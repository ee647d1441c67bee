//! SQLite persistence for game snapshots.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{GameRow, NewGame, NewSnapshot, Snapshot};
pub use repository::GameRepository;
