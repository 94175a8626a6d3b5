//! Request middleware.

pub mod interrogation;

pub use interrogation::interrogation_middleware;
