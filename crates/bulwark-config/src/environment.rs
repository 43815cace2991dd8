use serde::Deserialize;

/// Runtime environment the process is deployed in
///
/// Production switches logging to JSON and withholds stack traces from the
/// failure log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}
