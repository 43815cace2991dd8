use std::path::Path;

use secrecy::ExposeSecret;

use crate::{AnyOrArray, Config};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_health_config()?;
        self.validate_cors_config()?;
        self.validate_auth_config()?;
        self.validate_database_config()?;
        Ok(())
    }

    fn validate_health_config(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        if health.enabled && (!health.path.starts_with('/') || health.path == "/") {
            anyhow::bail!("server.health.path must be a route below /api, got `{}`", health.path);
        }

        Ok(())
    }

    /// Browsers refuse credentialed responses with a wildcard origin
    fn validate_cors_config(&self) -> anyhow::Result<()> {
        let cors = &self.server.cors;

        if cors.credentials && cors.origins == AnyOrArray::Any {
            anyhow::bail!("server.cors.credentials cannot be combined with a wildcard origin");
        }

        if let AnyOrArray::List(origins) = &cors.origins
            && origins.is_empty()
        {
            anyhow::bail!("server.cors.origins must list at least one origin");
        }

        Ok(())
    }

    fn validate_auth_config(&self) -> anyhow::Result<()> {
        let Some(ref auth) = self.auth else {
            return Ok(());
        };

        if auth.jwt_secret.expose_secret().is_empty() {
            anyhow::bail!("auth.jwt_secret must not be empty");
        }

        if auth.session_cookie.is_empty() {
            anyhow::bail!("auth.session_cookie must not be empty");
        }

        Ok(())
    }

    fn validate_database_config(&self) -> anyhow::Result<()> {
        let Some(ref database) = self.database else {
            return Ok(());
        };

        for (field, value) in [
            ("host", &database.host),
            ("name", &database.name),
            ("user", &database.user),
        ] {
            if value.is_empty() {
                anyhow::bail!("database.{field} is required");
            }
        }

        if database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be greater than 0");
        }

        Ok(())
    }
}
