//! gate-core: shared gating infrastructure for the platform apps.
//!
//! Both the admin panel and the consumer site gate access with three
//! independent checks: identity authentication, session validity, and
//! age-verification consent. This crate carries the pieces they share:
//! the verdict model and pure evaluators, the session cookie protocol,
//! the identity provider adapter and its state feed, middleware, errors,
//! and observability setup.
pub mod error;
pub mod identity;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod session;
pub mod verdict;

pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
pub use validator;
