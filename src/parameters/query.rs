//! Query string extraction.
//!
//! Two independent passes over the same query string:
//! configured `{key, map_to}` mappings write `param:<map_to>`, and every raw
//! pair is exposed as `query:<key>`. Repeated keys resolve to the last
//! occurrence.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::config::schema::QueryMapping;
use crate::parameters::types::{namespace, ParameterMap};

/// Extracts query-string parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryExtractor {
    mappings: Vec<QueryMapping>,
}

impl QueryExtractor {
    pub fn new(mappings: &[QueryMapping]) -> Self {
        Self {
            mappings: mappings.to_vec(),
        }
    }

    /// Apply both passes to a raw (undecoded) query string.
    pub fn extract(&self, query: Option<&str>, params: &mut ParameterMap) {
        let pairs = parse_query(query.unwrap_or_default());

        for mapping in &self.mappings {
            if let Some(value) = pairs.get(&mapping.key) {
                params.insert(namespace::PARAM, &mapping.map_to, value.as_str());
            }
        }

        for (key, value) in pairs {
            params.insert(namespace::QUERY, &key, value);
        }
    }
}

/// Decode a query string into key/value pairs, last occurrence winning.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
