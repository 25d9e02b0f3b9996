//! Translation of service errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::validation::ValidationError;
use crate::Error;

/// The errors a request handler can respond with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] Error),

    /// The request was malformed or failed input validation.
    #[error("{0}")]
    Validation(String),

    /// The CSV export could not be written.
    ///
    /// The details are only logged, the client gets a generic message.
    #[error("could not export transactions: {0}")]
    Export(String),
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation(error.0)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Service(Error::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Service(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(Error::ImmutableFieldViolation { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Export(_) => {
                tracing::error!("{}", self);
                "internal server error".to_owned()
            }
            error => {
                tracing::info!(%status, "request failed: {error}");
                error.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
