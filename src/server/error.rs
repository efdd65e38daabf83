use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Fixed body message for every server-side failure
pub const SERVER_ERROR_MESSAGE: &str = "Erreur serveur";

/// Fixed body message for an unknown article id
pub const NOT_FOUND_MESSAGE: &str = "Article non trouvé";

/// Errors surfaced by the HTTP handlers.
///
/// Details are logged when the response is built; clients only ever see one
/// of two fixed messages.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Article not found")]
    NotFound,

    /// Malformed ids are not distinguished from server errors.
    #[error("Malformed article id: {0:?}")]
    InvalidId(String),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidId(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::NotFound => NOT_FOUND_MESSAGE,
            ApiError::InvalidId(raw) => {
                tracing::warn!(id = %raw, "Rejecting malformed article id");
                SERVER_ERROR_MESSAGE
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "Request failed");
                SERVER_ERROR_MESSAGE
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// Parse an article id path segment
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_string()))
}
