//! Request parameter interrogation library.
//!
//! Turns an HTTP request into one flat map of namespaced parameters
//! (`url:*`, `param:*`, `query:*`, `header:*`, `cookie:*`, `user:*`, `cdn:*`).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod parameters;

pub use config::schema::InterrogatorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use parameters::{AuthenticatedUser, ConnectionSecurity, ParameterMap, RequestInterrogator};
