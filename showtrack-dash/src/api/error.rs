//! Error responses for catalog and dashboard handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use showtrack_common::Error;

/// Handler error
#[derive(Debug)]
pub enum ApiError {
    /// Mutation attempted without a viewer header
    Unauthenticated,
    Store(Error),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "You must be signed in to do that".to_string(),
            ),
            ApiError::Store(e) => {
                let status = match &e {
                    Error::NotFound { .. } => StatusCode::NOT_FOUND,
                    Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    Error::Forbidden(_) => StatusCode::FORBIDDEN,
                    Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::CorruptRow { .. } => {
                        error!("Request failed: {}", e);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
