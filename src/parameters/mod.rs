//! Request interrogation subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (uri, headers, cookies, extensions)
//!     → interrogator.rs (canonical url:href, orchestration)
//!     → matcher.rs   (path rules → param:*)
//!     → query.rs     (query string → param:*, query:*)
//!     → fields.rs    (headers → header:*, cookies → cookie:*)
//!     → user.rs      (authenticated user → user:*)
//!     → cdn.rs       (templates → cdn:*)
//!     → Return: one flat ParameterMap via completion callback
//!
//! Compilation (at startup / reload):
//!     ParameterConfig + CdnConfig + InterrogationContext
//!     → Compile url rules (regex) and cdn templates
//!     → Freeze as immutable RequestInterrogator
//! ```
//!
//! # Design Decisions
//! - Rules compiled once, immutable at request time
//! - All matching url rules apply, in order; last write wins per name
//! - Namespaces are disjoint key prefixes, so sources never collide
//! - Bad configuration fails at construction, never at request time

pub mod cdn;
pub mod fields;
pub mod interrogator;
pub mod matcher;
pub mod query;
pub mod types;
pub mod user;

pub use interrogator::{ConnectionSecurity, RequestInterrogator};
pub use types::{InterrogationError, ParameterError, ParameterMap};
pub use user::AuthenticatedUser;
