//! Identity provider that trusts a test header

use async_trait::async_trait;
use bulwark_core::AuthContext;
use bulwark_server::IdentityProvider;
use http::request::Parts;

pub const USER_HEADER: &str = "x-test-user";

/// Resolves the user from `x-test-user`; an `outage` value simulates a
/// provider failure
pub struct HeaderIdentity;

#[async_trait]
impl IdentityProvider for HeaderIdentity {
    async fn auth_context(&self, parts: &Parts) -> anyhow::Result<AuthContext> {
        match parts.headers.get(USER_HEADER).and_then(|v| v.to_str().ok()) {
            Some("outage") => anyhow::bail!("identity service timed out"),
            Some(user) => Ok(AuthContext::for_user(user)),
            None => Ok(AuthContext::anonymous()),
        }
    }
}
