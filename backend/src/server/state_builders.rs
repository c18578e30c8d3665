//! Builders assembling the HTTP state from configured adapters.
//!
//! When a database pool is configured the Diesel-backed repositories serve
//! enrollments, progress, and signups; without one the in-memory adapters
//! take their place so the server runs self-contained in fixture mode. The
//! lesson catalog and meetup roster come from fixtures in both modes.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use crate::domain::media::{CredentialIssuer, MediaSigningConfig, SigningKeyCache};
use crate::domain::ports::{EnrollmentRepository, MeetupSignupRepository, ProgressRepository};
use crate::domain::media::MediaService;
use crate::domain::{EnrollmentGate, MeetupService, ProgressService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DieselEnrollmentRepository, DieselMeetupSignupRepository, DieselProgressRepository,
    FixtureLessonCatalog, MemoryEnrollmentRepository, MemoryMeetupSignupRepository,
    MemoryProgressRepository,
};

use super::ServerConfig;

struct MediaParts {
    media: MediaSigningConfig,
    key_cache: Arc<SigningKeyCache>,
    catalog: Arc<FixtureLessonCatalog>,
    clock: Arc<dyn Clock>,
}

/// Wire the domain services over one set of repository adapters.
fn assemble<E, P, M>(
    config: &ServerConfig,
    parts: MediaParts,
    enrollments: Arc<E>,
    progress: Arc<P>,
    signups: Arc<M>,
) -> HttpState
where
    E: EnrollmentRepository + 'static,
    P: ProgressRepository + 'static,
    M: MeetupSignupRepository + 'static,
{
    let MediaParts {
        media,
        key_cache,
        catalog,
        clock,
    } = parts;

    let media_service = MediaService::new(
        EnrollmentGate::new(enrollments),
        catalog.clone(),
        key_cache,
        CredentialIssuer::new(media),
        clock.clone(),
    );
    let progress_service = ProgressService::new(progress, catalog, clock.clone());
    let meetup_service = MeetupService::new(config.meetups.clone(), signups, clock.clone());

    HttpState {
        media: Arc::new(media_service),
        progress: Arc::new(progress_service),
        meetups: Arc::new(meetup_service),
        clock,
        default_expiry_minutes: config.default_expiry_minutes,
    }
}

/// Build the handler state from the configuration, choosing Diesel or
/// in-memory adapters based on pool availability.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let parts = MediaParts {
        media: config.media.clone(),
        key_cache: Arc::new(SigningKeyCache::new(
            config.secrets.clone(),
            config.media.secret_name(),
        )),
        catalog: config.catalog.clone(),
        clock,
    };

    let state = match &config.db_pool {
        Some(pool) => assemble(
            config,
            parts,
            Arc::new(DieselEnrollmentRepository::new(pool.clone())),
            Arc::new(DieselProgressRepository::new(pool.clone())),
            Arc::new(DieselMeetupSignupRepository::new(pool.clone())),
        ),
        None => assemble(
            config,
            parts,
            Arc::new(MemoryEnrollmentRepository::seeded(
                config.enrollment_seed.clone(),
            )),
            Arc::new(MemoryProgressRepository::default()),
            Arc::new(MemoryMeetupSignupRepository::default()),
        ),
    };

    web::Data::new(state)
}
