use async_trait::async_trait;
use bulwark_config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};

use crate::DbError;

/// Operations the server and migration runner need from the data store
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Round-trip a trivial statement to prove connectivity
    async fn ping(&self) -> Result<(), DbError>;

    /// Run a (possibly multi-statement) SQL script without parameters
    async fn execute_script(&self, sql: &str) -> Result<(), DbError>;
}

/// Positional query parameter (`$1`, `$2`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Postgres-backed store sharing one connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build the pool from configuration
    ///
    /// Connections are opened lazily; call [`PgStore::assert_connection`]
    /// to fail fast at startup.
    pub fn connect(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(config.password.expose_secret());

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(options);

        Self { pool }
    }

    /// Wrap an existing pool
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Verify the database is reachable
    ///
    /// # Errors
    ///
    /// Returns the driver error if `SELECT 1` fails
    pub async fn assert_connection(&self) -> Result<(), DbError> {
        match self.ping().await {
            Ok(()) => {
                tracing::info!("connected to PostgreSQL");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to connect to PostgreSQL");
                Err(e)
            }
        }
    }

    /// Execute a parameterized query and return all rows
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Query`] on connectivity or query failure; the
    /// failing statement and its parameters are logged first
    pub async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<PgRow>, DbError> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                SqlParam::Null => query.bind(None::<String>),
                SqlParam::Bool(value) => query.bind(*value),
                SqlParam::Int(value) => query.bind(*value),
                SqlParam::Float(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.clone()),
                SqlParam::Json(value) => query.bind(sqlx::types::Json(value.clone())),
            };
        }

        query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!(query = sql, params = ?params, error = %e, "database query failed");
            DbError::Query(e)
        })
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn execute_script(&self, sql: &str) -> Result<(), DbError> {
        sqlx::raw_sql(sql).execute(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, "database script failed");
            DbError::Query(e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn params_convert_from_plain_values() {
        assert_eq!(SqlParam::from("alice"), SqlParam::Text("alice".to_owned()));
        assert_eq!(SqlParam::from(42_i64), SqlParam::Int(42));
        assert_eq!(SqlParam::from(None::<String>), SqlParam::Null);
        assert_eq!(SqlParam::from(Some(true)), SqlParam::Bool(true));
        assert_eq!(SqlParam::Json(json!({ "a": 1 })), SqlParam::Json(json!({ "a": 1 })));
    }
}
