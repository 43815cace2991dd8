#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod cors;
pub mod database;
mod env;
pub mod environment;
pub mod health;
mod loader;
pub mod logging;
pub mod server;

use serde::Deserialize;

pub use auth::*;
pub use cors::*;
pub use database::*;
pub use environment::*;
pub use health::*;
pub use logging::*;
pub use server::*;

/// Top-level Bulwark configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Runtime environment; controls log format and stack-trace logging
    #[serde(default)]
    pub environment: Environment,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Session token verification; when absent every protected route answers 401
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    /// Postgres connection settings; when absent the server runs without a data store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Log filtering
    #[serde(default)]
    pub logging: LoggingConfig,
}
