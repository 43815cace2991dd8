use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use bulwark_core::{ApiError, AuthenticatedUser};
use http::StatusCode;
use http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::auth::SIGN_IN_REQUIRED;
use crate::error::AppError;

/// JSON request body whose parse failures are raised as `BadRequest`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_rejection(&rejection).into()),
        }
    }
}

/// JSON request body that must also pass schema validation
///
/// Validation issues are raised as a structured validation failure, which
/// the error handler reports as `400 Invalid request data` with per-field
/// details.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(request, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Signed-in caller placed on the request by the auth gate
///
/// Extracting it on a route that is not behind the gate raises
/// `Unauthorized` rather than failing open.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(Self)
            .ok_or_else(|| ApiError::unauthorized(SIGN_IN_REQUIRED).into())
    }
}

fn body_rejection(rejection: &JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body",
        JsonRejection::JsonDataError(_) => "Request body has the wrong shape",
        _ if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        _ => "Could not read request body",
    };

    ApiError::bad_request(message).with_details(json!({ "reason": rejection.body_text() }))
}
