//! Header and cookie copying.
//!
//! # Design Decisions
//! - Header names use the `http` crate's lowercase normalization, nothing more
//! - Repeated headers are joined with ", " in arrival order
//! - Header values that are not valid visible text are skipped
//! - Cookies come from every `Cookie` header; the first occurrence of a name wins

use axum::http::header::{HeaderMap, COOKIE};
use percent_encoding::percent_decode_str;

use crate::parameters::types::{namespace, ParameterMap};

/// Copy every header into `header:<name>`.
pub fn copy_headers(headers: &HeaderMap, params: &mut ParameterMap) {
    for name in headers.keys() {
        let mut values = Vec::new();
        for value in headers.get_all(name) {
            match value.to_str() {
                Ok(v) => values.push(v),
                Err(_) => tracing::debug!(header = %name, "Skipping non-text header value"),
            }
        }
        if !values.is_empty() {
            params.insert(namespace::HEADER, name.as_str(), values.join(", "));
        }
    }
}

/// Copy every cookie into `cookie:<name>`.
pub fn copy_cookies(headers: &HeaderMap, params: &mut ParameterMap) {
    for (name, value) in parse_cookies(headers) {
        params.insert(namespace::COOKIE, &name, value);
    }
}

/// Parse all `Cookie` headers into ordered, de-duplicated pairs.
pub fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    let mut cookies: Vec<(String, String)> = Vec::new();

    let pairs = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'));

    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || cookies.iter().any(|(n, _)| n == name) {
            continue;
        }
        cookies.push((name.to_string(), decode_cookie_value(value.trim())));
    }

    cookies
}

fn decode_cookie_value(raw: &str) -> String {
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);

    percent_decode_str(unquoted)
        .decode_utf8()
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| unquoted.to_string())
}
