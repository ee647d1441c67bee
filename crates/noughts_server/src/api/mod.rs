//! JSON-over-HTTP interface.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | POST | `/game` | `new_game` |
//! | GET | `/game` | `list_games` |
//! | GET | `/game/{gid}` | `get_game` |
//! | POST | `/game/{gid}/move` | `make_move` |

mod error;
mod routes;
mod views;

pub use error::ApiError;
pub use views::{
    BoardRows, GameResponse, MoveRequest, NewGameResponse, TurnResponse, board_rows, winner,
};

use crate::service::GameService;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::instrument;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The game service.
    pub service: Arc<GameService>,
}

impl AppState {
    /// Wraps a service for sharing across handlers.
    pub fn new(service: GameService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Builds the application router.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/game", post(routes::new_game).get(routes::list_games))
        .route("/game/{gid}", get(routes::get_game))
        .route("/game/{gid}/move", post(routes::make_move))
        .layer(ServiceBuilder::new().map_request(routes::log_request))
        .with_state(state)
}
