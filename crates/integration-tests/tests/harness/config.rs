//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use bulwark_config::{AnyOrArray, Config, CorsConfig, Environment, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                environment: Environment::Test,
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Allow any origin without credentials
    pub fn with_open_cors(mut self) -> Self {
        self.config.server.cors = CorsConfig {
            origins: AnyOrArray::Any,
            credentials: false,
            ..CorsConfig::default()
        };
        self
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.config.server.body_limit = bytes;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
