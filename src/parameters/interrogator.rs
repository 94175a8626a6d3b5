//! Request interrogation orchestrator.
//!
//! # Responsibilities
//! - Build the canonical page url (`url:href`, `url:href:encoded`)
//! - Run every extractor over its part of the request
//! - Merge all namespaces into one map and deliver it exactly once
//!
//! # Design Decisions
//! - Immutable after construction; share via `Arc` across requests
//! - Completion is a single-fire continuation (`FnOnce`) or a ready future,
//!   so asynchronous sources can be added without changing callers
//! - A request without a host is rejected and the callback never fires

use std::future::{self, Ready};

use axum::http::header::{HOST, HeaderMap};
use axum::http::Request;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::schema::{CdnConfig, InterrogationContext, InterrogatorConfig, ParameterConfig};
use crate::parameters::cdn::CdnUrlResolver;
use crate::parameters::fields::{copy_cookies, copy_headers};
use crate::parameters::matcher::PatternMatcher;
use crate::parameters::query::QueryExtractor;
use crate::parameters::types::{namespace, InterrogationError, ParameterError, ParameterMap};
use crate::parameters::user::{extract_user, AuthenticatedUser};

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Security of the client connection, attached as a request extension by
/// the serving layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionSecurity {
    Plain,
    Secure,
}

impl ConnectionSecurity {
    fn scheme(self) -> &'static str {
        match self {
            ConnectionSecurity::Plain => "http",
            ConnectionSecurity::Secure => "https",
        }
    }
}

/// Canonical page url of a request, split into template variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    pub href: String,
    pub scheme: &'static str,
    pub host: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    /// `?` plus the raw query, or empty.
    pub search: String,
}

impl PageUrl {
    pub fn new(scheme: &'static str, host: &str, pathname: &str, query: Option<&str>) -> Self {
        let search = query.map(|q| format!("?{}", q)).unwrap_or_default();
        let (hostname, port) = split_host(host);
        Self {
            href: format!("{}://{}{}{}", scheme, host, pathname, search),
            scheme,
            host: host.to_string(),
            hostname: hostname.to_string(),
            port: port.to_string(),
            pathname: pathname.to_string(),
            search,
        }
    }

    /// The scheme followed by `:`, as `url.protocol` templates expect.
    pub fn protocol(&self) -> &'static str {
        match self.scheme {
            "https" => "https:",
            _ => "http:",
        }
    }

    /// `encodeURIComponent` form of `href`.
    pub fn encoded(&self) -> String {
        utf8_percent_encode(&self.href, URI_COMPONENT).to_string()
    }
}

/// Split `host[:port]`, keeping IPv6 literals bracketed.
fn split_host(host: &str) -> (&str, &str) {
    if host.starts_with('[') {
        return match host.find("]:") {
            Some(end) => (&host[..=end], &host[end + 2..]),
            None => (host, ""),
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => (name, port),
        _ => (host, ""),
    }
}

/// Turns a request into a flat, namespaced [`ParameterMap`].
#[derive(Debug, Clone, Default)]
pub struct RequestInterrogator {
    matcher: PatternMatcher,
    query: QueryExtractor,
    cdn: CdnUrlResolver,
    trust_forwarded_proto: bool,
}

impl RequestInterrogator {
    /// Compile parameter rules and cdn templates.
    pub fn new(
        parameters: &ParameterConfig,
        cdn: &CdnConfig,
        context: &InterrogationContext,
    ) -> Result<Self, ParameterError> {
        let interrogator = Self {
            matcher: PatternMatcher::new(&parameters.urls)?,
            query: QueryExtractor::new(&parameters.query),
            cdn: CdnUrlResolver::new(cdn, context)?,
            trust_forwarded_proto: false,
        };

        tracing::debug!(
            context = %context.name,
            url_rules = interrogator.matcher.len(),
            query_mappings = parameters.query.len(),
            cdn_templates = cdn.len(),
            "Request interrogator compiled"
        );

        Ok(interrogator)
    }

    /// Build from the full service configuration.
    pub fn from_config(config: &InterrogatorConfig) -> Result<Self, ParameterError> {
        Ok(Self::new(&config.parameters, &config.cdn, &config.context)?
            .with_forwarded_proto(config.listener.trust_forwarded_proto))
    }

    /// Honour `X-Forwarded-Proto` when inferring the scheme.
    pub fn with_forwarded_proto(mut self, trust: bool) -> Self {
        self.trust_forwarded_proto = trust;
        self
    }

    /// Interrogate `request` and hand the complete map to `on_complete`.
    ///
    /// `on_complete` runs at most once, and only on success.
    pub fn interrogate_request<B, F>(&self, request: &Request<B>, on_complete: F) -> Result<(), InterrogationError>
    where
        F: FnOnce(ParameterMap),
    {
        let params = self.collect(request)?;
        on_complete(params);
        Ok(())
    }

    /// Awaitable form of [`interrogate_request`](Self::interrogate_request).
    ///
    /// The map is computed before the future is returned, so the future
    /// does not borrow the request.
    pub fn interrogate<B>(&self, request: &Request<B>) -> Ready<Result<ParameterMap, InterrogationError>> {
        future::ready(self.collect(request))
    }

    fn collect<B>(&self, request: &Request<B>) -> Result<ParameterMap, InterrogationError> {
        let uri = request.uri();
        let headers = request.headers();
        let host = request_host(request).ok_or(InterrogationError::MissingHost)?;
        let page_url = PageUrl::new(self.scheme(request), host, uri.path(), uri.query());

        let mut params = ParameterMap::new();
        params.insert(namespace::URL, "href", page_url.href.as_str());
        params.insert(namespace::URL, "href:encoded", page_url.encoded());

        self.matcher.extract(uri.path(), &mut params);
        self.query.extract(uri.query(), &mut params);
        copy_headers(headers, &mut params);
        copy_cookies(headers, &mut params);
        extract_user(request.extensions().get::<AuthenticatedUser>(), &mut params);
        self.cdn.resolve(&page_url, &mut params);

        tracing::debug!(
            href = %page_url.href,
            parameters = params.len(),
            "Request interrogated"
        );

        Ok(params)
    }

    fn scheme<B>(&self, request: &Request<B>) -> &'static str {
        let security = request.extensions().get::<ConnectionSecurity>().copied();
        if security == Some(ConnectionSecurity::Secure) {
            return "https";
        }
        if self.trust_forwarded_proto {
            if let Some(scheme) = forwarded_scheme(request.headers()) {
                return scheme;
            }
        }
        if let Some(security) = security {
            return security.scheme();
        }
        match request.uri().scheme_str() {
            Some("https") => "https",
            _ => "http",
        }
    }
}

fn request_host<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .filter(|h| !h.is_empty())
}

/// First hop of `X-Forwarded-Proto`, if it names http or https.
fn forwarded_scheme(headers: &HeaderMap) -> Option<&'static str> {
    let value = headers.get(X_FORWARDED_PROTO)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.eq_ignore_ascii_case("https") {
        Some("https")
    } else if first.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request<()> {
        Request::builder()
            .uri(uri)
            .header("host", "localhost:5000")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_page_url() {
        let url = PageUrl::new("http", "localhost:5000", "/teaching-resource/a-1", Some("foo=bar"));
        assert_eq!(url.href, "http://localhost:5000/teaching-resource/a-1?foo=bar");
        assert_eq!(url.hostname, "localhost");
        assert_eq!(url.port, "5000");
        assert_eq!(url.search, "?foo=bar");
        assert_eq!(
            url.encoded(),
            "http%3A%2F%2Flocalhost%3A5000%2Fteaching-resource%2Fa-1%3Ffoo%3Dbar"
        );
    }

    #[test]
    fn test_encoded_keeps_uri_component_marks() {
        let url = PageUrl::new("http", "h", "/a_b.c!~*'()", None);
        assert_eq!(url.encoded(), "http%3A%2F%2Fh%2Fa_b.c!~*'()");
    }

    #[test]
    fn test_split_host() {
        assert_eq!(split_host("example.com"), ("example.com", ""));
        assert_eq!(split_host("example.com:80"), ("example.com", "80"));
        assert_eq!(split_host("[::1]:8080"), ("[::1]", "8080"));
        assert_eq!(split_host("[::1]"), ("[::1]", ""));
    }

    #[test]
    fn test_scheme_from_connection_security() {
        let interrogator = RequestInterrogator::default();
        let mut req = request("/");
        req.extensions_mut().insert(ConnectionSecurity::Secure);

        let mut href = None;
        interrogator
            .interrogate_request(&req, |params| href = params.get_str("url:href").map(String::from))
            .unwrap();
        assert_eq!(href.as_deref(), Some("https://localhost:5000/"));
    }

    #[test]
    fn test_forwarded_proto_requires_trust() {
        let mut req = request("/a");
        req.headers_mut()
            .insert(X_FORWARDED_PROTO, "https, http".parse().unwrap());

        let untrusted = RequestInterrogator::default();
        assert_eq!(untrusted.scheme(&req), "http");

        let trusted = RequestInterrogator::default().with_forwarded_proto(true);
        assert_eq!(trusted.scheme(&req), "https");
    }

    #[test]
    fn test_secure_connection_outranks_forwarded_proto() {
        let trusted = RequestInterrogator::default().with_forwarded_proto(true);

        let mut req = request("/");
        req.headers_mut().insert(X_FORWARDED_PROTO, "http".parse().unwrap());
        req.extensions_mut().insert(ConnectionSecurity::Secure);
        let params = trusted.collect(&req).unwrap();
        assert_eq!(params.get_str("url:href"), Some("https://localhost:5000/"));

        // A plain connection still defers to the trusted header.
        let mut req = request("/");
        req.headers_mut().insert(X_FORWARDED_PROTO, "https".parse().unwrap());
        req.extensions_mut().insert(ConnectionSecurity::Plain);
        assert_eq!(trusted.scheme(&req), "https");
    }

    #[test]
    fn test_authority_fallback() {
        let req = Request::builder()
            .uri("https://cdn.example.com/x")
            .body(())
            .unwrap();
        let params = RequestInterrogator::default().collect(&req).unwrap();
        assert_eq!(params.get_str("url:href"), Some("https://cdn.example.com/x"));
    }

    #[test]
    fn test_missing_host_skips_callback() {
        let req = Request::builder().uri("/x").body(()).unwrap();
        let mut called = false;
        let result = RequestInterrogator::default().interrogate_request(&req, |_| called = true);

        assert_eq!(result, Err(InterrogationError::MissingHost));
        assert!(!called);
    }
}
