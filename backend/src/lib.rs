//! Redemption-code service library modules.
//!
//! The crate follows a hexagonal layout: transport-agnostic types and
//! services live under [`domain`], HTTP handlers under [`inbound`], and
//! Diesel/PostgreSQL adapters under [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware and the task-local trace identifier.
pub use middleware::trace::{Trace, TraceId};
