use secrecy::SecretString;
use serde::Deserialize;

/// Postgres connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: SecretString,
    /// Upper bound on pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_port() -> u16 {
    5432
}

const fn default_max_connections() -> u32 {
    10
}
