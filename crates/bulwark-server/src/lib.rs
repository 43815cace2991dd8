#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! HTTP pipeline for Bulwark
//!
//! Requests pass security headers, CORS, tracing and the central error
//! handler before reaching the `/api` router. Stages raise [`AppError`] and
//! never render failures themselves.

mod auth;
mod cors;
mod error;
mod error_handler;
mod extract;
mod identity;
mod not_found;
mod routes;
mod security_headers;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bulwark_config::Config;
use bulwark_db::DataStore;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use auth::auth_gate;
pub use error::AppError;
pub use error_handler::{ErrorHandler, FailureRecord, Resolution, error_handler_middleware};
pub use extract::{CurrentUser, JsonBody, ValidatedJson};
pub use identity::{AnonymousIdentityProvider, IdentityProvider, JwtIdentityProvider, SessionClaims};
pub use routes::ApiRoutes;

/// Handles the pipeline needs from the rest of the process
///
/// Built once at startup and moved into the server.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Option<Arc<dyn DataStore>>,
    pub routes: ApiRoutes,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            identity: Arc::new(AnonymousIdentityProvider),
            store: None,
            routes: ApiRoutes::new(),
        }
    }
}

impl Collaborators {
    /// Identity resolved from `[auth]`, anonymous when it is absent
    pub fn from_config(config: &Config, store: Option<Arc<dyn DataStore>>) -> Self {
        let identity: Arc<dyn IdentityProvider> = match &config.auth {
            Some(auth) => Arc::new(JwtIdentityProvider::from_config(auth)),
            None => {
                tracing::warn!("no [auth] section configured; protected routes will answer 401");
                Arc::new(AnonymousIdentityProvider)
            }
        };

        Self {
            identity,
            store,
            routes: ApiRoutes::new(),
        }
    }

    #[must_use]
    pub fn with_routes(mut self, routes: ApiRoutes) -> Self {
        self.routes = routes;
        self
    }
}

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the health route path is not absolute
    pub fn new(config: &Config, collaborators: Collaborators) -> anyhow::Result<Self> {
        let Collaborators {
            identity,
            store,
            routes: api_routes,
        } = collaborators;

        let server = &config.server;

        // Protected routes: the gate runs only once one of them matched
        let protected = api_routes.protected.route("/me", get(routes::me_handler)).route_layer(
            axum::middleware::from_fn(move |req, next| {
                let identity = Arc::clone(&identity);
                async move { auth::auth_gate(identity, req, next).await }
            }),
        );

        // Public routes
        let mut public = api_routes.public;
        if server.health.enabled {
            if !server.health.path.starts_with('/') {
                anyhow::bail!("health path must start with '/': {}", server.health.path);
            }
            public = public.merge(
                Router::new()
                    .route(&server.health.path, get(routes::health_handler))
                    .with_state(store),
            );
            tracing::debug!(path = %server.health.mounted_path(), "health probe enabled");
        }

        let api = Router::new()
            .merge(protected)
            .merge(public)
            .method_not_allowed_fallback(not_found::method_not_allowed_fallback);

        let mut app = Router::new()
            .nest("/api", api)
            .fallback(not_found::not_found_fallback);

        // Apply middleware layers (innermost first)

        // Body size cap for extractors
        app = app.layer(DefaultBodyLimit::max(server.body_limit));

        // Panics in handlers become unrecognized errors
        app = app.layer(CatchPanicLayer::custom(panic_response));

        // Central error handler
        let handler = ErrorHandler::new(config.environment);
        app = app.layer(axum::middleware::from_fn(move |req, next| async move {
            error_handler::error_handler_middleware(handler, req, next).await
        }));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        app = app.layer(cors::cors_layer(&server.cors));

        // Security headers (outermost, so failures carry them too)
        app = app.layer(axum::middleware::from_fn(security_headers::security_headers_middleware));

        Ok(Self {
            router: app,
            listen_address: server.listen_address(),
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    AppError::Unrecognized(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
