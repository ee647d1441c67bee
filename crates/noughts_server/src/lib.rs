//! Noughts server: HTTP API, persistence and terminal play on top of
//! [`noughts_core`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod cli;
mod config;
mod db;
mod service;
mod store;
mod terminal;

pub use api::{
    ApiError, AppState, BoardRows, GameResponse, MoveRequest, NewGameResponse, TurnResponse,
    board_rows, router, winner,
};
pub use cli::{Cli, Command, ServeArgs};
pub use config::{
    ConfigError, ConfigOverrides, DEFAULT_CONFIG_FILE, ENV_DATABASE_URL, ENV_MODE, ENV_PORT,
    ServerConfig,
};
pub use db::{DbError, GameRepository, GameRow, NewGame, NewSnapshot, Snapshot};
pub use service::{GameService, GameView, ServiceError};
pub use store::{GameId, GameStore, MemoryStore, StoreError};
pub use terminal::run_terminal;
