//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! interrogation service. All types derive Serde traits for deserialization
//! from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the interrogation service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct InterrogatorConfig {
    /// Listener configuration (bind address, forwarded headers).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Context values available to cdn templates.
    pub context: InterrogationContext,

    /// Path and query parameter extraction rules.
    pub parameters: ParameterConfig,

    /// Cdn base urls, keyed by the name emitted as `cdn:<key>`.
    pub cdn: CdnConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Honour `X-Forwarded-Proto` when inferring the page url scheme.
    /// Only enable behind a trusted proxy.
    pub trust_forwarded_proto: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            trust_forwarded_proto: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Named context of the running service.
///
/// `name` and every extra field become template variables.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct InterrogationContext {
    /// Service name, e.g. the environment or site identifier.
    pub name: String,

    /// Additional template variables.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl InterrogationContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Look up a context variable by name.
    pub fn get(&self, variable: &str) -> Option<&str> {
        if variable == "name" {
            Some(&self.name)
        } else {
            self.extra.get(variable).map(String::as_str)
        }
    }
}

impl Default for InterrogationContext {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Parameter extraction rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ParameterConfig {
    /// Query keys to copy into `param:*`, in order.
    pub query: Vec<QueryMapping>,

    /// Path rules, applied in order. Later rules overwrite earlier ones.
    pub urls: Vec<UrlRule>,
}

/// Copies query key `key` into `param:<map_to>`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct QueryMapping {
    pub key: String,

    #[serde(alias = "mapTo")]
    pub map_to: String,
}

impl QueryMapping {
    pub fn new(key: impl Into<String>, map_to: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            map_to: map_to.into(),
        }
    }
}

/// A path pattern and the parameter names bound to its capture groups.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UrlRule {
    /// Regular expression searched for in the request path.
    pub pattern: String,

    /// One name per capture group, by position.
    #[serde(default)]
    pub names: Vec<String>,
}

impl UrlRule {
    pub fn new<I, S>(pattern: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern: pattern.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Cdn template strings keyed by output name.
pub type CdnConfig = BTreeMap<String, String>;

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
