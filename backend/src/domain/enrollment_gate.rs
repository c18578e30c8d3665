//! Enrollment authorization gate.
//!
//! The gate answers one question: may this learner access this course's
//! media right now? It re-reads the enrollment on every call (payment state
//! can change between requests, e.g. a refund) and deliberately lives apart
//! from credential issuance so authorization can evolve without touching
//! signing code.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{CourseId, Error, LearnerId};

/// Denial message shared by the unenrolled and unpaid cases.
///
/// Deliberately identical for a missing enrollment and a disallowed payment
/// status so error text does not reveal whether a course exists.
const NOT_ENROLLED: &str = "not enrolled";

fn map_repository_error(error: EnrollmentRepositoryError) -> Error {
    match error {
        EnrollmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("enrollment store unavailable: {message}"))
        }
        EnrollmentRepositoryError::Query { message } => {
            Error::internal(format!("enrollment store error: {message}"))
        }
    }
}

/// Authorization gate over the enrollment repository.
#[derive(Clone)]
pub struct EnrollmentGate<R> {
    enrollments: Arc<R>,
}

impl<R> EnrollmentGate<R>
where
    R: EnrollmentRepository,
{
    /// Create a gate reading from the given repository.
    pub fn new(enrollments: Arc<R>) -> Self {
        Self { enrollments }
    }

    /// Authorize a (learner, course) pair for media access.
    ///
    /// Succeeds silently when the payment status grants access; no decision
    /// is cached across calls.
    ///
    /// # Errors
    /// `Forbidden` when no enrollment exists or its payment status is
    /// `pending`/`failed`; `ServiceUnavailable` when the store is
    /// unreachable.
    pub async fn authorize(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<(), Error> {
        let enrollment = self
            .enrollments
            .find(learner_id, course_id)
            .await
            .map_err(map_repository_error)?;

        match enrollment {
            Some(found) if found.grants_access() => Ok(()),
            Some(found) => {
                debug!(
                    learner_id = %learner_id,
                    course_id = %course_id,
                    payment_status = %found.payment_status,
                    "enrollment present but not access-granting"
                );
                Err(Error::forbidden(NOT_ENROLLED))
            }
            None => {
                debug!(
                    learner_id = %learner_id,
                    course_id = %course_id,
                    "no enrollment found"
                );
                Err(Error::forbidden(NOT_ENROLLED))
            }
        }
    }
}

#[cfg(test)]
#[path = "enrollment_gate_tests.rs"]
mod tests;
