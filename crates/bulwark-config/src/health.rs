use serde::Deserialize;

/// `GET` probe mounted inside the `/api` namespace
///
/// With the defaults the route answers at `/api/health`. When a database is
/// configured the probe also pings it and reports 503 if it is unreachable.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Disabled probes fall through to the not-found handler
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Route below `/api`; must start with `/`
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_path(),
        }
    }
}

impl HealthConfig {
    /// Full request path the probe answers on
    pub fn mounted_path(&self) -> String {
        format!("/api{}", self.path)
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/health".to_owned()
}
