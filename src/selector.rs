//! # Label Selector Parsing
//!
//! Parses a label-selector string (`env=prod,tier in (web,api),!legacy`) into the
//! structured form carried by a `SelectorSyncSet`.
//!
//! ## Supported Requirements
//!
//! | Syntax            | Result                                   |
//! |-------------------|------------------------------------------|
//! | `k=v`, `k==v`     | `matchLabels[k] = v`                     |
//! | `k!=v`            | `matchExpressions: k NotIn [v]`          |
//! | `k in (a,b)`      | `matchExpressions: k In [a, b]`          |
//! | `k notin (a,b)`   | `matchExpressions: k NotIn [a, b]`       |
//! | `k`               | `matchExpressions: k Exists`             |
//! | `!k`              | `matchExpressions: k DoesNotExist`       |
//!
//! An empty selector matches every cluster, so what happens on a parse failure is
//! decided by [`SelectorPolicy`].

use crate::constants::{MAX_LABEL_NAME_LENGTH, MAX_LABEL_PREFIX_LENGTH};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

/// `key in (a,b)` / `key notin (a,b)`
static SET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[^\s!=(),]+)\s+(?P<op>in|notin)\s*\((?P<values>[^()]*)\)$")
        .expect("set requirement regex is valid")
});

/// Label value, and the name part of a label key
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("label name regex is valid")
});

/// DNS subdomain prefix of a label key
static DNS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("DNS subdomain regex is valid")
});

/// Error type for selector parsing
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("empty requirement in selector '{0}'")]
    EmptyRequirement(String),
    #[error("unbalanced parentheses in selector '{0}'")]
    UnbalancedParentheses(String),
    #[error("invalid requirement '{0}'")]
    InvalidRequirement(String),
    #[error("operator '{0}' is not supported in a label selector")]
    UnsupportedOperator(String),
    #[error("invalid label key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("invalid label value '{value}': {reason}")]
    InvalidValue { value: String, reason: String },
}

/// What to do when a selector fails to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectorPolicy {
    /// Log the error and fall back to an empty selector
    #[default]
    Lenient,
    /// Fail the run
    Strict,
}

/// Parse a selector string
///
/// # Errors
///
/// Returns a `SelectorError` describing the first invalid requirement.
pub fn parse_label_selector(input: &str) -> Result<LabelSelector, SelectorError> {
    let mut match_labels = BTreeMap::new();
    let mut match_expressions = Vec::new();

    for requirement in split_requirements(input)? {
        if requirement.is_empty() {
            return Err(SelectorError::EmptyRequirement(input.to_string()));
        }

        if let Some(caps) = SET_PATTERN.captures(requirement) {
            if caps["values"].trim().is_empty() {
                return Err(SelectorError::InvalidRequirement(requirement.to_string()));
            }
            let key = validate_key(&caps["key"])?;
            let values = caps["values"]
                .split(',')
                .map(str::trim)
                .map(validate_value)
                .collect::<Result<Vec<_>, _>>()?;
            let operator = if &caps["op"] == "in" { "In" } else { "NotIn" };
            match_expressions.push(expression(key, operator, Some(values)));
        } else if let Some(key) = requirement.strip_prefix('!') {
            if key.contains(['=', '(', ')']) {
                return Err(SelectorError::InvalidRequirement(requirement.to_string()));
            }
            let key = validate_key(key.trim())?;
            match_expressions.push(expression(key, "DoesNotExist", None));
        } else if let Some((key, value)) = requirement.split_once("!=") {
            let key = validate_key(key.trim())?;
            let value = validate_value(value.trim())?;
            match_expressions.push(expression(key, "NotIn", Some(vec![value])));
        } else if let Some((key, value)) = requirement.split_once('=') {
            let value = value.strip_prefix('=').unwrap_or(value);
            let key = validate_key(key.trim())?;
            let value = validate_value(value.trim())?;
            match_labels.insert(key, value);
        } else if let Some(op) = ['<', '>'].into_iter().find(|op| requirement.contains(*op)) {
            return Err(SelectorError::UnsupportedOperator(op.to_string()));
        } else if requirement.contains(char::is_whitespace) || requirement.contains(['(', ')']) {
            return Err(SelectorError::InvalidRequirement(requirement.to_string()));
        } else {
            let key = validate_key(requirement)?;
            match_expressions.push(expression(key, "Exists", None));
        }
    }

    Ok(LabelSelector {
        match_labels: (!match_labels.is_empty()).then_some(match_labels),
        match_expressions: (!match_expressions.is_empty()).then_some(match_expressions),
    })
}

/// Parse a selector, applying `policy` on failure
///
/// # Errors
///
/// Only with [`SelectorPolicy::Strict`]; the lenient policy logs the error and
/// returns an empty selector.
pub fn resolve_label_selector(
    input: &str,
    policy: SelectorPolicy,
) -> Result<LabelSelector, SelectorError> {
    match parse_label_selector(input) {
        Ok(selector) => Ok(selector),
        Err(e) if policy == SelectorPolicy::Lenient => {
            warn!(
                "Failed to parse label selector '{}': {}; falling back to an empty selector",
                input, e
            );
            Ok(LabelSelector::default())
        }
        Err(e) => Err(e),
    }
}

/// Split on commas that are not inside parentheses
fn split_requirements(input: &str) -> Result<Vec<&str>, SelectorError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut requirements = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SelectorError::UnbalancedParentheses(input.to_string()))?;
            }
            ',' if depth == 0 => {
                requirements.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(SelectorError::UnbalancedParentheses(input.to_string()));
    }
    requirements.push(input[start..].trim());
    Ok(requirements)
}

fn expression(
    key: String,
    operator: &str,
    values: Option<Vec<String>>,
) -> LabelSelectorRequirement {
    LabelSelectorRequirement {
        key,
        operator: operator.to_string(),
        values,
    }
}

/// Qualified name: optional DNS-subdomain prefix and `/`, then a name
fn validate_key(key: &str) -> Result<String, SelectorError> {
    let invalid = |reason: String| SelectorError::InvalidKey {
        key: key.to_string(),
        reason,
    };
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        if prefix.is_empty() || prefix.len() > MAX_LABEL_PREFIX_LENGTH {
            return Err(invalid(format!(
                "prefix must be 1-{MAX_LABEL_PREFIX_LENGTH} characters"
            )));
        }
        if !DNS_PATTERN.is_match(prefix) {
            return Err(invalid("prefix must be a lowercase DNS subdomain".to_string()));
        }
    }
    if name.is_empty() || name.len() > MAX_LABEL_NAME_LENGTH {
        return Err(invalid(format!(
            "name must be 1-{MAX_LABEL_NAME_LENGTH} characters"
        )));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(invalid(
            "name must be alphanumeric, '-', '_' or '.', starting and ending with an alphanumeric"
                .to_string(),
        ));
    }
    Ok(key.to_string())
}

/// Label value: empty, or a name of at most 63 characters
fn validate_value(value: &str) -> Result<String, SelectorError> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let invalid = |reason: String| SelectorError::InvalidValue {
        value: value.to_string(),
        reason,
    };
    if value.len() > MAX_LABEL_NAME_LENGTH {
        return Err(invalid(format!(
            "must be at most {MAX_LABEL_NAME_LENGTH} characters"
        )));
    }
    if !NAME_PATTERN.is_match(value) {
        return Err(invalid(
            "must be alphanumeric, '-', '_' or '.', starting and ending with an alphanumeric"
                .to_string(),
        ));
    }
    Ok(value.to_string())
}
