//! HTTP handlers.

use super::error::ApiError;
use super::views::{GameResponse, MoveRequest, NewGameResponse, TurnResponse};
use super::AppState;
use crate::store::GameId;
use axum::Json;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::Request;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Logs every incoming request.
pub fn log_request(req: Request<Body>) -> Request<Body> {
    info!(
        method = %req.method(),
        uri = %req.uri(),
        "Incoming HTTP request"
    );
    req
}

/// `POST /game`: starts a new game.
#[instrument(skip(state))]
pub async fn new_game(State(state): State<AppState>) -> Result<Json<NewGameResponse>, ApiError> {
    let service = Arc::clone(&state.service);
    let (gid, board) = tokio::task::spawn_blocking(move || service.new_game()).await??;
    info!(game_id = gid, "Game created over HTTP");
    Ok(Json(NewGameResponse::new(gid, &board)))
}

/// `GET /game`: lists game ids in creation order.
#[instrument(skip(state))]
pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<GameId>>, ApiError> {
    let service = Arc::clone(&state.service);
    let ids = tokio::task::spawn_blocking(move || service.list()).await??;
    Ok(Json(ids))
}

/// `GET /game/{gid}`: full history of a game.
#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(gid): Path<GameId>,
) -> Result<Json<GameResponse>, ApiError> {
    let service = Arc::clone(&state.service);
    let view = tokio::task::spawn_blocking(move || service.view(gid)).await??;
    Ok(Json(GameResponse::from(&view)))
}

/// `POST /game/{gid}/move`: plays a human move and the opponent's reply.
///
/// A body that cannot be read as a move is answered like an illegal move.
#[instrument(skip(state, payload))]
pub async fn make_move(
    State(state): State<AppState>,
    Path(gid): Path<GameId>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let Json(req) = payload?;
    let mv = req.to_move();
    debug!(mv = %mv, "Move requested");

    let service = Arc::clone(&state.service);
    let turn = tokio::task::spawn_blocking(move || service.play(gid, mv)).await??;
    Ok(Json(TurnResponse::from(&turn)))
}
