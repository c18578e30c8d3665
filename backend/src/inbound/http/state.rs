//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{MediaAccess, Meetups, ProgressTracking};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Media credential issuance behind the enrollment gate.
    pub media: Arc<dyn MediaAccess>,
    /// Progress recording and reads.
    pub progress: Arc<dyn ProgressTracking>,
    /// Meetup listing and signup.
    pub meetups: Arc<dyn Meetups>,
    /// Clock for listing-time occurrence computation.
    pub clock: Arc<dyn Clock>,
    /// Default resource-token lifetime in minutes.
    pub default_expiry_minutes: u32,
}
