use bulwark_core::{ApiError, ErrorKind};

use crate::error::AppError;

pub(crate) const ROUTE_NOT_FOUND: &str = "Route not found";

/// Reached when no route matched the request path
pub async fn not_found_fallback() -> AppError {
    ApiError::not_found(ROUTE_NOT_FOUND).into()
}

/// Reached when the path matched but the method did not
pub async fn method_not_allowed_fallback() -> AppError {
    ErrorKind::MethodNotAllowed.into()
}
