use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use bulwark_core::{ApiError, ErrorKind, ValidationFailure};
use bulwark_db::DbError;
use http::StatusCode;

/// Error raised by any pipeline stage
///
/// Stages never render failures themselves. Converting an `AppError` into a
/// response only parks it on the response for the central error handler,
/// which is the single place that produces the client-facing body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failure from the closed taxonomy
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Schema validation rejected the request body
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Anything else; never shown to the client
    #[error(transparent)]
    Unrecognized(#[from] anyhow::Error),
}

impl AppError {
    /// Status the central handler will resolve this error to
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Api(e) => e.status(),
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unrecognized(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        Self::Api(ApiError::new(kind))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}

impl From<DbError> for AppError {
    fn from(error: DbError) -> Self {
        Self::Unrecognized(error.into())
    }
}

/// Per-request channel carrying a raised error to the central handler
#[derive(Debug, Clone)]
pub(crate) struct Raised(pub(crate) Arc<AppError>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(Raised(Arc::new(self)));
        response
    }
}
