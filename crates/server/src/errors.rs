use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::errors::StoreError;

/// Non-success outcome of one request. The `IntoResponse` match is the
/// single, exhaustive mapping from outcome kind to status and envelope.
///
/// Two body shapes exist on purpose: handler-local failures render
/// `{"message": ...}`, while anything reaching the terminal stage renders
/// `{"error": {"message": ...}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete input; reported before any store call.
    #[error("{0}")]
    Validation(&'static str),
    /// Known resource, absent id.
    #[error("{0}")]
    NotFound(&'static str),
    /// No handler matched the request.
    #[error("Not Found")]
    RouteNotFound,
    /// Backing medium failure, propagated unchanged from the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"message": msg})),
            )
                .into_response(),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"message": msg})),
            )
                .into_response(),
            ApiError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": {"message": "Not Found"}})),
            )
                .into_response(),
            ApiError::Store(e) => {
                let msg = e.to_string();
                error!(error = %msg, "store failure reached the terminal error stage");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": {"message": msg}})),
                )
                    .into_response()
            }
        }
    }
}
