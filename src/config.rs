//! # Generator Configuration
//!
//! Process-level settings loaded from environment variables.
//! Command-line flags override whatever is read here.

use crate::constants::{DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL};
use crate::selector::SelectorPolicy;

/// Generator-level configuration
///
/// All settings have defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Log level applied to this crate when `RUST_LOG` is not set
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: LogFormat,
    /// What to do with a label selector that fails to parse
    pub selector_policy: SelectorPolicy,
}

/// Output format of the log stream on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::parse(DEFAULT_LOG_FORMAT),
            selector_policy: SelectorPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a closure over a fixed map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let strict = var_or_default_bool(&lookup, "SS_STRICT_SELECTOR", false);
        Self {
            log_level: var_or_default_str(&lookup, "LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format: LogFormat::parse(&var_or_default_str(
                &lookup,
                "LOG_FORMAT",
                DEFAULT_LOG_FORMAT,
            )),
            selector_policy: if strict {
                SelectorPolicy::Strict
            } else {
                SelectorPolicy::Lenient
            },
        }
    }
}

/// Read variable as boolean or return default
fn var_or_default_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read variable as string or return default
fn var_or_default_str<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.selector_policy, SelectorPolicy::Lenient);
    }

    #[test]
    fn test_environment_overrides() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("SS_STRICT_SELECTOR", "yes"),
        ]));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.selector_policy, SelectorPolicy::Strict);
    }

    #[test]
    fn test_unrecognised_values_fall_back() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "  "),
            ("LOG_FORMAT", "xml"),
            ("SS_STRICT_SELECTOR", "maybe"),
        ]));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.selector_policy, SelectorPolicy::Lenient);
    }
}
