//! Driving port for progress recording and reads.

use async_trait::async_trait;

use crate::domain::{CourseId, Error, LearnerId, LessonId, ProgressSnapshot};

/// Driving port for per-learner course progress.
///
/// `record_completion` is idempotent; callers may retry a transient
/// `ServiceUnavailable` without double-counting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressTracking: Send + Sync {
    /// Record that the learner opened a lesson, updating the last-accessed
    /// marker without touching the completed set.
    async fn record_access(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<(), Error>;

    /// Record a lesson completion and return the refreshed snapshot.
    async fn record_completion(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<ProgressSnapshot, Error>;

    /// Read the current snapshot; a learner with no progress yet receives
    /// the zero state, not an error.
    async fn get_snapshot(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<ProgressSnapshot, Error>;
}
