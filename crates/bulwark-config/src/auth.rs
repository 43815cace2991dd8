use secrecy::SecretString;
use serde::Deserialize;

/// Session token verification
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret used to verify HS256 session tokens
    pub jwt_secret: SecretString,

    /// Cookie that carries the session token when no `Authorization` header is sent
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

fn default_session_cookie() -> String {
    "__session".to_string()
}
