use async_trait::async_trait;
use bulwark_config::AuthConfig;
use bulwark_core::AuthContext;
use http::HeaderMap;
use http::request::Parts;
use jwt_compact::alg::{Hs256, Hs256Key};
use jwt_compact::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Source of per-request authentication state
///
/// Implementations resolve who is calling. An absent session is reported
/// as an anonymous context, not an error; errors are reserved for the
/// provider itself failing (network, outage).
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn auth_context(&self, parts: &Parts) -> anyhow::Result<AuthContext>;
}

/// Provider used when authentication is not configured
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentityProvider;

#[async_trait]
impl IdentityProvider for AnonymousIdentityProvider {
    async fn auth_context(&self, _parts: &Parts) -> anyhow::Result<AuthContext> {
        Ok(AuthContext::anonymous())
    }
}

/// Claims read from a session token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User identifier
    #[serde(default, rename = "sub", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Verifies HS256 session tokens
///
/// The token is taken from `Authorization: Bearer ...`, falling back to the
/// session cookie. Tokens that are malformed, badly signed, expired, or
/// missing an expiry resolve to an anonymous context.
pub struct JwtIdentityProvider {
    key: Hs256Key,
    session_cookie: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: &SecretString, session_cookie: impl Into<String>) -> Self {
        Self {
            key: Hs256Key::new(secret.expose_secret().as_bytes()),
            session_cookie: session_cookie.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.session_cookie.clone())
    }

    fn token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let bearer = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        bearer.or_else(|| cookie_value(headers, &self.session_cookie))
    }

    fn verify(&self, raw: &str) -> Option<String> {
        let untrusted = match UntrustedToken::new(raw) {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!(error = %e, "malformed session token");
                return None;
            }
        };

        let token: Token<SessionClaims> = match Hs256.validator(&self.key).validate(&untrusted) {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!(error = %e, "session token rejected");
                return None;
            }
        };

        if let Err(e) = token.claims().validate_expiration(&TimeOptions::default()) {
            tracing::debug!(error = %e, "session token expired");
            return None;
        }

        token.claims().custom.subject.clone()
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn auth_context(&self, parts: &Parts) -> anyhow::Result<AuthContext> {
        let user_id = self.token(&parts.headers).and_then(|raw| self.verify(raw));
        Ok(AuthContext { user_id })
    }
}

/// Find a cookie by name across all `Cookie` headers
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
