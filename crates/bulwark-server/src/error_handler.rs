use std::backtrace::BacktraceStatus;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bulwark_config::Environment;
use bulwark_core::ErrorEnvelope;
use http::{HeaderValue, Method, StatusCode, Uri, header};
use serde_json::Value;

use crate::error::{AppError, Raised};

pub(crate) const INVALID_REQUEST_DATA: &str = "Invalid request data";
pub(crate) const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Written when the envelope itself cannot be serialized
const FALLBACK_BODY: &[u8] = br#"{"success":false,"error":{"message":"Internal Server Error","status":500}}"#;

/// Terminal stage turning raised errors into failure envelopes
///
/// Every error raised below it, whether by the auth gate, a route handler,
/// the not-found fallback, or a caught panic, arrives here exactly once.
#[derive(Debug, Clone, Copy)]
pub struct ErrorHandler {
    environment: Environment,
}

impl ErrorHandler {
    pub const fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Log the failure and render its envelope
    pub fn handle(&self, method: &Method, url: &Uri, error: &AppError) -> Response {
        let resolution = Resolution::classify(error);
        FailureRecord::new(method, url, &resolution, error, self.environment).emit();
        resolution.into_response()
    }
}

/// Middleware wrapping route dispatch and the fallbacks
pub async fn error_handler_middleware(handler: ErrorHandler, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let url = request.uri().clone();

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<Raised>() {
        Some(Raised(error)) => handler.handle(&method, &url, &error),
        None => response,
    }
}

/// What the client will be told
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl Resolution {
    /// Classify a raised error
    ///
    /// Taxonomy errors pass through verbatim, validation failures become a
    /// 400 with per-field details, and everything else collapses to a bare
    /// 500 so internal messages never leave the process.
    pub fn classify(error: &AppError) -> Self {
        match error {
            AppError::Api(e) => Self {
                status: e.status(),
                message: e.message().to_owned(),
                details: e.details().cloned(),
            },
            AppError::Validation(failure) => Self {
                status: StatusCode::BAD_REQUEST,
                message: INVALID_REQUEST_DATA.to_owned(),
                details: if failure.issues().is_empty() {
                    None
                } else {
                    serde_json::to_value(failure.details()).ok()
                },
            },
            AppError::Unrecognized(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: INTERNAL_SERVER_ERROR.to_owned(),
                details: None,
            },
        }
    }
}

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope::new(self.status.as_u16(), self.message, self.details);

        let (status, body) = match serde_json::to_vec(&envelope) {
            Ok(body) => (self.status, body),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize error envelope");
                (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_vec())
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response()
    }
}

/// Structured log record emitted once per failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub message: String,
    /// Diagnostic trace; withheld in production
    pub stack: Option<String>,
}

impl FailureRecord {
    pub fn new(
        method: &Method,
        url: &Uri,
        resolution: &Resolution,
        error: &AppError,
        environment: Environment,
    ) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            status: resolution.status.as_u16(),
            message: resolution.message.clone(),
            stack: (!environment.is_production()).then(|| diagnostic_trace(error)),
        }
    }

    pub fn emit(&self) {
        match &self.stack {
            Some(stack) => tracing::error!(
                method = %self.method,
                url = %self.url,
                status = self.status,
                error_message = %self.message,
                stack = %stack,
                "Request failed"
            ),
            None => tracing::error!(
                method = %self.method,
                url = %self.url,
                status = self.status,
                error_message = %self.message,
                "Request failed"
            ),
        }
    }
}

/// Best available trace for an error: description, cause chain, and backtrace when captured
fn diagnostic_trace(error: &AppError) -> String {
    match error {
        AppError::Api(e) => {
            let head = format!("{}: {}", e.kind().name(), e.message());
            if e.backtrace().status() == BacktraceStatus::Captured {
                format!("{head}\n{}", e.backtrace())
            } else {
                head
            }
        }
        AppError::Validation(failure) => format!("{failure}: {:?}", failure.issues()),
        AppError::Unrecognized(e) => format!("{e:?}"),
    }
}
