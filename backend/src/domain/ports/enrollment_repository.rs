//! Port abstraction for enrollment persistence.

use async_trait::async_trait;

use crate::domain::{CourseId, Enrollment, LearnerId};

/// Errors raised by enrollment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentRepositoryError {
    /// Store connection could not be established or timed out.
    #[error("enrollment store connection failed: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("enrollment store query failed: {message}")]
    Query {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl EnrollmentRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for enrollment reads and creation.
///
/// The gate only needs [`EnrollmentRepository::find`]; `save` exists for the
/// signup surface and for seeding fixtures. There is no delete: enrollments
/// are never removed in normal operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Point read by the (learner, course) composite key.
    async fn find(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError>;

    /// Insert an enrollment, a no-op when the pair already exists.
    async fn save(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError>;
}
