use std::backtrace::Backtrace;
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Closed set of failure kinds a request can end in
///
/// Each kind is bound to exactly one HTTP status and carries a default
/// client-facing message. The set is closed so that classification in the
/// error handler is a plain match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Conflict,
    Validation,
    TooManyRequests,
    Internal,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
}

impl ErrorKind {
    /// HTTP status code bound to this kind
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Message used when the raiser does not supply one
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Resource Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Conflict => "Conflict",
            Self::Validation => "Validation Failed",
            Self::TooManyRequests => "Too Many Requests",
            Self::Internal => "Internal Server Error",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::GatewayTimeout => "Gateway Timeout",
        }
    }

    /// Whether the failure is the server's fault rather than the client's
    pub const fn is_server_error(self) -> bool {
        matches!(
            self,
            Self::Internal | Self::BadGateway | Self::ServiceUnavailable | Self::GatewayTimeout
        )
    }

    /// Variant name, used as the `kind` field in logs
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A failure raised somewhere in the request lifecycle
///
/// The only sanctioned way for application code to signal a client-visible
/// failure. The message is always non-empty and safe to show to clients.
/// `details` is attached only when it carries something meaningful, such as
/// field-level validation issues.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    details: Option<Value>,
    trace: Arc<Backtrace>,
}

impl ApiError {
    /// Create an error with the kind's default message
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_owned(),
            details: None,
            trace: Arc::new(Backtrace::capture()),
        }
    }

    /// Create an error with a custom message
    ///
    /// An empty or whitespace-only message falls back to the default.
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut error = Self::new(kind);
        if !message.trim().is_empty() {
            error.message = message;
        }
        error
    }

    /// Attach a structured details payload
    #[must_use]
    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::NotFound, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::MethodNotAllowed, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Conflict, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Validation, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::TooManyRequests, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Internal, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::BadGateway, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::ServiceUnavailable, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::GatewayTimeout, message)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Backtrace captured where the error was constructed
    ///
    /// Only populated when backtraces are enabled (`RUST_BACKTRACE`).
    pub fn backtrace(&self) -> &Backtrace {
        &self.trace
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
