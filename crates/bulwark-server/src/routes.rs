use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router};
use bulwark_core::ApiError;
use bulwark_db::DataStore;
use serde_json::json;

use crate::error::AppError;
use crate::extract::CurrentUser;

pub(crate) const DATABASE_UNAVAILABLE: &str = "Database unavailable";

/// Application routes mounted under `/api`
///
/// Public routes are reachable anonymously. Protected routes sit behind the
/// auth gate, which only runs once one of them has matched.
#[derive(Debug, Clone)]
pub struct ApiRoutes {
    pub(crate) public: Router,
    pub(crate) protected: Router,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiRoutes {
    pub fn new() -> Self {
        Self {
            public: Router::new(),
            protected: Router::new(),
        }
    }

    /// Add routes that do not require a session
    #[must_use]
    pub fn public(mut self, router: Router) -> Self {
        self.public = self.public.merge(router);
        self
    }

    /// Add routes that require a signed-in user
    #[must_use]
    pub fn protected(mut self, router: Router) -> Self {
        self.protected = self.protected.merge(router);
        self
    }
}

/// Liveness plus, when a store is configured, a database round trip
pub(crate) async fn health_handler(
    State(store): State<Option<Arc<dyn DataStore>>>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(store) = store
        && let Err(e) = store.ping().await
    {
        tracing::warn!(error = %e, "health check could not reach the database");
        return Err(ApiError::service_unavailable(DATABASE_UNAVAILABLE).into());
    }

    Ok(Json(json!({ "success": true, "data": { "status": "ok" } })))
}

/// Who the current session belongs to
pub(crate) async fn me_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(json!({ "success": true, "data": { "userId": user.user_id } }))
}
