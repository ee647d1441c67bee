//! Mapping of service failures onto HTTP responses.

use crate::service::ServiceError;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use serde_json::json;
use tracing::{error, warn};

/// Error returned by the HTTP handlers.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// A service operation failed.
    #[display("{_0}")]
    Service(ServiceError),
    /// The move body was missing, malformed or out of range.
    #[display("Invalid move request: {_0}")]
    Request(JsonRejection),
    /// A blocking task panicked or was cancelled.
    #[display("Worker task failed: {_0}")]
    Join(tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Service(ServiceError::Move(err)) => {
                warn!(error = %err, "Illegal move");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "detail": "Illegal move",
                        "error": err.kind(),
                        "message": err.to_string(),
                    }),
                )
            }
            ApiError::Request(rejection) => {
                warn!(error = %rejection.body_text(), "Invalid move request");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "detail": "Illegal move",
                        "error": "invalid_request",
                        "message": rejection.body_text(),
                    }),
                )
            }
            ApiError::Service(ServiceError::Store(StoreError::GameNotFound(id))) => {
                warn!(game_id = id, "Game not found");
                (StatusCode::NOT_FOUND, json!({ "detail": "Game not found" }))
            }
            ApiError::Service(ServiceError::Store(err @ StoreError::Conflict { .. })) => {
                warn!(error = %err, "Concurrent update");
                (
                    StatusCode::CONFLICT,
                    json!({ "detail": "Game was updated concurrently", "message": err.to_string() }),
                )
            }
            ApiError::Service(ServiceError::Store(StoreError::Db(err))) => {
                error!(error = %err, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
            ApiError::Join(err) => {
                error!(error = %err, "Worker task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
