//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, rule & template compilation)
//!     → InterrogatorConfig (validated, immutable)
//!     → compiled into a RequestInterrogator
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server rebuilds and atomically swaps the interrogator
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::CdnConfig;
pub use schema::InterrogationContext;
pub use schema::InterrogatorConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ParameterConfig;
pub use schema::QueryMapping;
pub use schema::UrlRule;
