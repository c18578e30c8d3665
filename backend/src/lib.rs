//! Studyhall backend library: course delivery over signed media credentials,
//! lesson progress tracking, and recurring community meetups.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities,
//! services, and ports; `inbound` the HTTP adapters; `outbound` the
//! persistence and secret store adapters; `server` wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Trace middleware attaching a request-scoped trace identifier.
pub use middleware::Trace;
