use serde::Deserialize;

use crate::Environment;

/// Log filtering
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; defaults depend on the environment
    #[serde(default)]
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Effective filter: the configured one, else `info` in production and `debug` elsewhere
    pub fn effective_filter(&self, environment: Environment) -> &str {
        match (&self.filter, environment) {
            (Some(filter), _) => filter,
            (None, Environment::Production) => "info",
            (None, _) => "debug",
        }
    }
}
