//! # Observability
//!
//! Tracing subscriber setup for the `ss` binary.
//!
//! Logs always go to stderr so stdout carries nothing but generated output.
//! `RUST_LOG` takes precedence; otherwise the configured level applies to this
//! crate and the binary.

use crate::config::{GeneratorConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
#[must_use]
pub fn default_directive(log_level: &str) -> String {
    format!("syncset_generator={log_level},ss={log_level}")
}

fn env_filter(config: &GeneratorConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.log_level)))
        .unwrap_or_else(|_| default_directive(crate::constants::DEFAULT_LOG_LEVEL).into())
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(
    config: &GeneratorConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
}
