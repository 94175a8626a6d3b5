//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum::http::Request;
use request_interrogator::config::{InterrogationContext, ParameterConfig, QueryMapping, UrlRule};
use request_interrogator::{ParameterMap, RequestInterrogator};

pub const RESOURCE_PATH: &str = "/teaching-resource/Queen-Elizabeth-II-Diamond-jubilee-2012-6206420";
pub const RESOURCE_BLURB: &str = "Queen-Elizabeth-II-Diamond-jubilee-2012";
pub const HOST: &str = "localhost:5000";

/// Configuration shared by most scenarios.
pub const TEST_CONFIG: &str = r#"
[listener]
bind_address = "127.0.0.1:0"

[context]
name = "test"

[parameters]
query = [{ key = "storyCode", mapTo = "resourceId" }]

[[parameters.urls]]
pattern = '/teaching-resource/(.*)-(\d+)'
names = ["blurb", "resourceId"]

[cdn]
url = "http://my.cloudfront.net/{{name}}/"
"#;

/// A GET request for `uri` with the test host header.
pub fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri).header("host", HOST)
}

pub fn parameter_config(query: Vec<QueryMapping>, urls: Vec<UrlRule>) -> ParameterConfig {
    ParameterConfig { query, urls }
}

/// Interrogator for the given rules, no cdn, context `test`.
pub fn interrogator(parameters: ParameterConfig) -> RequestInterrogator {
    RequestInterrogator::new(&parameters, &Default::default(), &InterrogationContext::new("test"))
        .expect("valid test configuration")
}

/// Run `interrogator` and return the map handed to the callback.
pub fn interrogate<B>(interrogator: &RequestInterrogator, request: &Request<B>) -> ParameterMap {
    let mut delivered = None;
    interrogator
        .interrogate_request(request, |params| delivered = Some(params))
        .expect("interrogation succeeds");
    delivered.expect("callback fired")
}
