//! Logging for Bulwark
//!
//! Installs the process-wide `tracing` subscriber. Production emits one JSON
//! object per event; every other environment gets human-readable output.

use bulwark_config::{Environment, LoggingConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub const fn for_environment(environment: Environment) -> Self {
        if environment.is_production() { Self::Json } else { Self::Pretty }
    }
}

/// Initialize logging from configuration
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &LoggingConfig, environment: Environment) -> anyhow::Result<()> {
    let filter = build_filter(config.effective_filter(environment));

    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::for_environment(environment) {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(false)
                .with_span_list(false);

            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
        }
    }

    Ok(())
}

/// Parse a filter directive, falling back to `info` when it is invalid
fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter `{directive}`: {e}; using `info`");
        EnvFilter::new("info")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_logs_json() {
        assert_eq!(LogFormat::for_environment(Environment::Production), LogFormat::Json);
        assert_eq!(LogFormat::for_environment(Environment::Development), LogFormat::Pretty);
        assert_eq!(LogFormat::for_environment(Environment::Test), LogFormat::Pretty);
    }

    #[test]
    fn invalid_filter_falls_back_to_info() {
        let filter = build_filter("bulwark=loud");
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn valid_filter_is_kept() {
        let filter = build_filter("bulwark_server=debug");
        assert_eq!(filter.to_string(), "bulwark_server=debug");
    }
}
