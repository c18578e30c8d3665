//! Media access domain service.
//!
//! Composes the enrollment gate, the lesson catalog, the signing key cache,
//! and the credential issuer behind the [`MediaAccess`] driving port. The
//! gate runs and must succeed before any catalog or credential work starts;
//! no credential is minted, even speculatively, for an unauthorized request,
//! and a denied request reveals nothing about catalog contents.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::media::{CredentialIssuer, SigningKeyCache};
use crate::domain::ports::{
    CoursePass, EnrollmentRepository, LessonCatalog, LessonCatalogError, MediaAccess,
    SignedResourceUrl,
};
use crate::domain::{CourseId, EnrollmentGate, Error, LearnerId, LessonId};

fn map_catalog_error(error: LessonCatalogError) -> Error {
    match error {
        LessonCatalogError::Connection { message } => {
            Error::service_unavailable(format!("lesson catalog unavailable: {message}"))
        }
        LessonCatalogError::UnknownCourse { course_id } => {
            Error::not_found(format!("course {course_id} not found"))
        }
    }
}

/// Media access service over the gate, key cache, and issuer.
pub struct MediaService<R, C> {
    gate: EnrollmentGate<R>,
    catalog: Arc<C>,
    key_cache: Arc<SigningKeyCache>,
    issuer: CredentialIssuer,
    clock: Arc<dyn Clock>,
}

impl<R, C> MediaService<R, C>
where
    R: EnrollmentRepository,
    C: LessonCatalog,
{
    /// Create a service from its collaborators.
    pub fn new(
        gate: EnrollmentGate<R>,
        catalog: Arc<C>,
        key_cache: Arc<SigningKeyCache>,
        issuer: CredentialIssuer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gate,
            catalog,
            key_cache,
            issuer,
            clock,
        }
    }
}

#[async_trait]
impl<R, C> MediaAccess for MediaService<R, C>
where
    R: EnrollmentRepository,
    C: LessonCatalog,
{
    async fn authorize_and_issue_resource_token(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        expiry_minutes: u32,
    ) -> Result<SignedResourceUrl, Error> {
        // The gate runs before any catalog lookup so a denied caller cannot
        // probe which courses exist.
        self.gate.authorize(learner_id, course_id).await?;
        let media_key = self
            .catalog
            .media_key(course_id, lesson_id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| {
                Error::not_found(format!("lesson {lesson_id} not found in course {course_id}"))
            })?;
        let key = self.key_cache.get_key().await?;
        let token =
            self.issuer
                .issue_resource_token(&key, &media_key, expiry_minutes, self.clock.utc())?;
        debug!(
            learner_id = %learner_id,
            course_id = %course_id,
            expires_at = token.expires_at,
            "resource token issued"
        );
        Ok(token)
    }

    async fn authorize_and_issue_course_pass(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<CoursePass, Error> {
        self.gate.authorize(learner_id, course_id).await?;
        let prefix = self
            .catalog
            .media_prefix(course_id)
            .await
            .map_err(map_catalog_error)?;
        let key = self.key_cache.get_key().await?;
        let pass = self
            .issuer
            .issue_course_pass(&key, &prefix, self.clock.utc())?;
        debug!(
            learner_id = %learner_id,
            course_id = %course_id,
            expires_at = pass.expires_at,
            "course pass issued"
        );
        Ok(pass)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
