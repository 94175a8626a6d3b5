//! Parameter map and error definitions.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Key prefixes partitioning the parameter map by source.
pub mod namespace {
    pub const URL: &str = "url";
    pub const PARAM: &str = "param";
    pub const QUERY: &str = "query";
    pub const HEADER: &str = "header";
    pub const COOKIE: &str = "cookie";
    pub const USER: &str = "user";
    pub const CDN: &str = "cdn";
}

/// Flat mapping from namespaced key (`param:resourceId`) to value.
///
/// Every source writes strings except `user:*`, which carries the
/// authenticated user's values as they were attached to the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap {
    entries: BTreeMap<String, Value>,
}

impl ParameterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `<namespace>:<name>`, replacing any earlier value.
    pub fn insert(&mut self, namespace: &str, name: &str, value: impl Into<Value>) {
        self.entries
            .insert(format!("{}:{}", namespace, name), value.into());
    }

    /// Look up a value by its full namespaced key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a string value by its full namespaced key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all keys that start with `<namespace>:`.
    pub fn namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.entries.iter().filter_map(move |(k, v)| {
            k.strip_prefix(namespace)
                .and_then(|rest| rest.strip_prefix(':'))
                .map(|_| (k.as_str(), v))
        })
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }
}

impl IntoIterator for ParameterMap {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Errors raised while compiling parameter configuration.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// A url rule pattern is not a valid regular expression.
    #[error("Invalid url pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A url rule binds a different number of names than it captures.
    #[error("Url pattern '{pattern}' has {captures} capture group(s) but {names} name(s)")]
    CaptureCountMismatch {
        pattern: String,
        captures: usize,
        names: usize,
    },

    /// A cdn template references a variable that is never available.
    #[error("Cdn template '{key}' references unknown variable '{variable}'")]
    UnknownTemplateVariable { key: String, variable: String },

    /// A cdn template has an opening `{{` without a closing `}}`.
    #[error("Cdn template '{key}' has an unterminated placeholder")]
    UnterminatedPlaceholder { key: String },
}

/// Errors raised while interrogating a single request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterrogationError {
    /// Neither a Host header nor a URI authority was present.
    #[error("Request has no host header or authority")]
    MissingHost,
}
