use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use bulwark_core::ApiError;

use crate::error::AppError;
use crate::identity::IdentityProvider;

pub(crate) const SIGN_IN_REQUIRED: &str = "You must be signed in to access this resource";

/// Require a signed-in user before the matched route handler runs
///
/// Resolves the caller through the identity provider. Without a user the
/// request short-circuits with `Unauthorized`; otherwise the user is
/// attached as an [`AuthenticatedUser`](bulwark_core::AuthenticatedUser)
/// extension and the request continues. Provider failures are raised as
/// unrecognized errors.
pub async fn auth_gate(
    identity: Arc<dyn IdentityProvider>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    let context = identity.auth_context(&parts).await?;

    let Some(user) = context.into_user() else {
        return Err(ApiError::unauthorized(SIGN_IN_REQUIRED).into());
    };

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
