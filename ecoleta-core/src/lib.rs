//! Core types and service wiring for registering Ecoleta collection points.

/// Registration form state and its transitions.
pub mod form;
/// Shared HTTP helpers for provider adapters.
pub mod http;
/// Domain models shared by all providers.
pub mod model;
/// Traits describing the provider interfaces.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use form::*;
pub use model::*;
pub use ports::*;
pub use service::*;
