//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every url rule and cdn template so bad patterns fail at load
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InterrogatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{CdnConfig, InterrogatorConfig};
use crate::parameters::cdn::CdnUrlResolver;
use crate::parameters::matcher::PatternMatcher;
use crate::parameters::types::ParameterError;

/// A single semantic problem in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("context.name must not be empty")]
    EmptyContextName,

    #[error("parameters.query[{index}] has an empty {field}")]
    EmptyQueryField { index: usize, field: &'static str },

    #[error("parameters.urls[{index}] has an empty pattern")]
    EmptyPattern { index: usize },

    #[error("parameters.urls[{index}] has an empty name")]
    EmptyName { index: usize },

    #[error("parameters.urls[{index}] binds '{name}' more than once")]
    DuplicateName { index: usize, name: String },

    #[error("parameters.urls[{index}]: {source}")]
    Rule {
        index: usize,
        #[source]
        source: ParameterError,
    },

    #[error("cdn.{key}: {source}")]
    Template {
        key: String,
        #[source]
        source: ParameterError,
    },
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &InterrogatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.context.name.trim().is_empty() {
        errors.push(ValidationError::EmptyContextName);
    }

    for (index, mapping) in config.parameters.query.iter().enumerate() {
        if mapping.key.is_empty() {
            errors.push(ValidationError::EmptyQueryField { index, field: "key" });
        }
        if mapping.map_to.is_empty() {
            errors.push(ValidationError::EmptyQueryField { index, field: "map_to" });
        }
    }

    for (index, rule) in config.parameters.urls.iter().enumerate() {
        if rule.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern { index });
            continue;
        }

        let mut seen = HashSet::new();
        for name in &rule.names {
            if name.is_empty() {
                errors.push(ValidationError::EmptyName { index });
            } else if !seen.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateName { index, name: name.clone() });
            }
        }

        if let Err(source) = PatternMatcher::new(std::slice::from_ref(rule)) {
            errors.push(ValidationError::Rule { index, source });
        }
    }

    for (key, template) in &config.cdn {
        let single = CdnConfig::from([(key.clone(), template.clone())]);
        if let Err(source) = CdnUrlResolver::new(&single, &config.context) {
            errors.push(ValidationError::Template { key: key.clone(), source });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
